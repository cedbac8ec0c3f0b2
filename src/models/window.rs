use serde::{Deserialize, Serialize};

use crate::models::ArrivalKind;

/// Which predicted arrivals the query window has to bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrivalScope {
    #[default]
    All,
    Direct,
}

impl ArrivalScope {
    pub fn kinds(&self) -> &'static [ArrivalKind] {
        match self {
            ArrivalScope::All => &ArrivalKind::ALL,
            ArrivalScope::Direct => &[ArrivalKind::Direct],
        }
    }
}

impl std::str::FromStr for ArrivalScope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(ArrivalScope::All),
            "direct" => Ok(ArrivalScope::Direct),
            other => Err(format!("unknown arrival scope '{}'", other)),
        }
    }
}

/// Half-open `[start, stop)` range of UTC epoch seconds on whole hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: i64,
    pub stop: i64,
}

impl TimeWindow {
    pub fn duration_seconds(&self) -> i64 {
        self.stop - self.start
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_seconds() as f64 / 3600.0
    }

    pub fn contains(&self, timestamp: f64) -> bool {
        timestamp >= self.start as f64 && timestamp < self.stop as f64
    }
}
