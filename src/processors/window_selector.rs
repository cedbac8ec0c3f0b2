use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{ArrivalScope, ArrivalSet, TimeWindow};
use crate::settings::WindowSettings;
use crate::utils::constants::SECONDS_PER_HOUR;

/// Derives the archive query range around the predicted arrivals.
pub struct WindowSelector {
    lead_hours: f64,
    lag_hours: f64,
    scope: ArrivalScope,
}

impl WindowSelector {
    pub fn new(lead_hours: f64, lag_hours: f64) -> Self {
        Self {
            lead_hours,
            lag_hours,
            scope: ArrivalScope::All,
        }
    }

    pub fn from_settings(settings: &WindowSettings) -> Self {
        Self::new(settings.lead_hours, settings.lag_hours).with_scope(settings.scope)
    }

    pub fn with_scope(mut self, scope: ArrivalScope) -> Self {
        self.scope = scope;
        self
    }

    /// `[floor_hour(first - lead), ceil_hour(last + lag))` over the arrivals
    /// in scope.
    pub fn select(&self, arrivals: &ArrivalSet) -> Result<TimeWindow> {
        let times: Vec<f64> = self
            .scope
            .kinds()
            .iter()
            .map(|kind| arrivals.get(*kind))
            .collect();

        let first = times.iter().copied().fold(f64::INFINITY, f64::min);
        let last = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if !first.is_finite() || !last.is_finite() {
            return Err(ProcessingError::InvalidParameter {
                parameter: "event.speed_km_s",
                message: format!("predicted arrivals are not finite ({} .. {})", first, last),
            });
        }

        let hour = SECONDS_PER_HOUR as f64;
        let start = ((first - self.lead_hours * hour) / hour).floor() as i64 * SECONDS_PER_HOUR;
        let stop = ((last + self.lag_hours * hour) / hour).ceil() as i64 * SECONDS_PER_HOUR;

        if stop <= start {
            return Err(ProcessingError::InvalidParameter {
                parameter: "window.lead_hours",
                message: format!(
                    "query window is empty (start {} >= stop {}); increase lead_hours or lag_hours",
                    start, stop
                ),
            });
        }

        let window = TimeWindow { start, stop };
        debug!(
            start,
            stop,
            hours = window.duration_hours(),
            "Selected query window"
        );
        Ok(window)
    }
}
