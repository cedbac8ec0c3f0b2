use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalKind {
    Direct,     // shortest path
    Opposite,   // long way round, through the event antipode
    SecondPass, // direct path after one full circuit
}

impl ArrivalKind {
    pub const ALL: [ArrivalKind; 3] = [
        ArrivalKind::Direct,
        ArrivalKind::Opposite,
        ArrivalKind::SecondPass,
    ];

    /// Short label drawn next to the arrival marker
    pub fn label(&self) -> &'static str {
        match self {
            ArrivalKind::Direct => "Initial",
            ArrivalKind::Opposite => "Reverse",
            ArrivalKind::SecondPass => "Second",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ArrivalKind::Direct => "arrival",
            ArrivalKind::Opposite => "opposite pulse arrival",
            ArrivalKind::SecondPass => "second time around pulse arrival",
        }
    }
}

impl std::fmt::Display for ArrivalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Predicted arrival times of a pressure pulse at one observer.
///
/// All timestamps are UTC epoch seconds and keep their fractional part; they
/// are only rounded for display and window alignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrivalSet {
    pub distance_km: f64,
    pub travel_seconds: f64,
    pub round_trip_seconds: f64,
    pub direct: f64,
    pub opposite: f64,
    pub second_pass: f64,
}

impl ArrivalSet {
    pub fn get(&self, kind: ArrivalKind) -> f64 {
        match kind {
            ArrivalKind::Direct => self.direct,
            ArrivalKind::Opposite => self.opposite,
            ArrivalKind::SecondPass => self.second_pass,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArrivalKind, f64)> + '_ {
        ArrivalKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    /// `%Y-%m-%d %H:%M:%S` in UTC, or the raw value if out of chrono's range.
    pub fn format_timestamp(timestamp: f64) -> String {
        match DateTime::<Utc>::from_timestamp(timestamp.round() as i64, 0) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format!("{:.0}", timestamp),
        }
    }

    /// Console lines reporting the distance and each arrival.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("distance to eruption {:.1} km", self.distance_km)];
        for (kind, timestamp) in self.iter() {
            lines.push(format!(
                "{} at {:.0} ({} UTC)",
                kind,
                timestamp,
                Self::format_timestamp(timestamp)
            ));
        }
        lines.join("\n")
    }
}
