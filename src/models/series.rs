use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One archive row: epoch seconds and barometric pressure in hPa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureSample {
    pub timestamp: i64,
    pub pressure_hpa: f64,
}

impl PressureSample {
    pub fn new(timestamp: i64, pressure_hpa: f64) -> Self {
        Self {
            timestamp,
            pressure_hpa,
        }
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Timestamp-ascending barometer readings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSeries {
    samples: Vec<PressureSample>,
}

impl SampleSeries {
    /// Sorts by timestamp; the archive query already returns rows in order.
    pub fn new(mut samples: Vec<PressureSample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[PressureSample] {
        &self.samples
    }

    pub fn timestamps(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.timestamp as f64)
    }

    pub fn pressures(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.pressure_hpa)
    }

    /// First and last timestamp.
    pub fn time_span(&self) -> Option<(i64, i64)> {
        Some((self.samples.first()?.timestamp, self.samples.last()?.timestamp))
    }

    /// Smallest and largest pressure.
    pub fn pressure_range(&self) -> Option<(f64, f64)> {
        value_range(self.pressures())
    }
}

impl From<Vec<(i64, f64)>> for SampleSeries {
    fn from(rows: Vec<(i64, f64)>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|(timestamp, pressure)| PressureSample::new(timestamp, pressure))
                .collect(),
        )
    }
}

/// Observed pressure minus the fitted baseline, index-aligned with the
/// sample series it was computed from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResidualSeries {
    pub baseline: Vec<f64>,
    pub residual: Vec<f64>,
}

impl ResidualSeries {
    pub fn len(&self) -> usize {
        self.residual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residual.is_empty()
    }

    pub fn residual_range(&self) -> Option<(f64, f64)> {
        value_range(self.residual.iter().copied())
    }

    pub fn sum_of_squares(&self) -> f64 {
        self.residual.iter().map(|r| r * r).sum()
    }

    /// Largest absolute residual and its index.
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.residual
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
    }
}

pub(crate) fn value_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
