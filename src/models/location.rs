use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::utils::coordinates::parse_coordinate;

/// A point on the Earth's surface in decimal degrees (WGS-84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeoPoint {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse a `lat,lon` pair where each half is decimal or `DD:MM:SS`.
    pub fn parse_pair(pair: &str) -> Result<Self> {
        let (lat, lon) = pair.split_once(',').ok_or_else(|| {
            ProcessingError::InvalidCoordinate(format!(
                "Expected 'latitude,longitude', got: '{}'",
                pair
            ))
        })?;

        let point = Self::new(parse_coordinate(lat)?, parse_coordinate(lon)?);
        point.validate()?;
        Ok(point)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}, {:.1}", self.latitude, self.longitude)
    }
}

/// The station whose barometer archive is analysed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Observer {
    #[serde(default)]
    pub name: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl Observer {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            name: None,
            latitude,
            longitude,
        }
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}
