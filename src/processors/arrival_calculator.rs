use tracing::debug;

use crate::models::{ArrivalSet, Observer, PulseEvent};
use crate::utils::coordinates::geodesic_distance;

/// Predicts when a pressure pulse reaches an observer.
///
/// The pulse is assumed to travel along the surface at a constant speed, so
/// the observer sees it three times within one circuit and a half: along the
/// short arc, along the long arc through the event antipode, and along the
/// short arc again after one full lap.
pub struct ArrivalCalculator;

impl ArrivalCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn predict(&self, observer: &Observer, event: &PulseEvent) -> ArrivalSet {
        let distance_km = geodesic_distance(event.location(), observer.location());
        let travel_seconds = distance_km / event.speed_km_s;
        let round_trip_seconds = event.round_trip_seconds();
        let origin = event.time as f64;

        let arrivals = ArrivalSet {
            distance_km,
            travel_seconds,
            round_trip_seconds,
            direct: origin + travel_seconds,
            opposite: origin + round_trip_seconds - travel_seconds,
            second_pass: origin + round_trip_seconds + travel_seconds,
        };

        debug!(
            distance_km,
            travel_seconds, round_trip_seconds, "Predicted arrivals for {}", event.name
        );
        arrivals
    }
}

impl Default for ArrivalCalculator {
    fn default() -> Self {
        Self::new()
    }
}
