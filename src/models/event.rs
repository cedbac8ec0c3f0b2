use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::GeoPoint;
use crate::utils::constants::{DEFAULT_EARTH_CIRCUMFERENCE_KM, DEFAULT_SPEED_KM_S};

/// An atmospheric pressure impulse: where and when it happened and how fast
/// its wave travels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PulseEvent {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// UTC epoch seconds
    pub time: i64,

    #[validate(range(exclusive_min = 0.0))]
    #[serde(default = "default_speed")]
    pub speed_km_s: f64,

    #[validate(range(exclusive_min = 0.0))]
    #[serde(default = "default_circumference")]
    pub earth_circumference_km: f64,
}

fn default_speed() -> f64 {
    DEFAULT_SPEED_KM_S
}

fn default_circumference() -> f64 {
    DEFAULT_EARTH_CIRCUMFERENCE_KM
}

impl PulseEvent {
    pub fn new(name: impl Into<String>, location: GeoPoint, time: i64, speed_km_s: f64) -> Self {
        Self {
            name: name.into(),
            latitude: location.latitude,
            longitude: location.longitude,
            time,
            speed_km_s,
            earth_circumference_km: DEFAULT_EARTH_CIRCUMFERENCE_KM,
        }
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Seconds for the wave to circle the globe once.
    pub fn round_trip_seconds(&self) -> f64 {
        self.earth_circumference_km / self.speed_km_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tonga() -> PulseEvent {
        PulseEvent::new(
            "Hunga Tonga",
            GeoPoint::new(-20.5452074472518, -175.38715105641674),
            1642220085,
            0.32,
        )
    }

    #[test]
    fn test_event_validation() {
        assert!(tonga().validate().is_ok());

        let mut stalled = tonga();
        stalled.speed_km_s = 0.0;
        assert!(stalled.validate().is_err());
    }

    #[test]
    fn test_round_trip_seconds() {
        let event = tonga();
        assert!((event.round_trip_seconds() - 125_125.0).abs() < 1e-6);
    }
}
