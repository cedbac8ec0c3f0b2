use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::error::{ProcessingError, Result};
use crate::models::{PressureSample, ResidualSeries, SampleSeries};

#[derive(Debug, Serialize)]
struct ResidualRow {
    timestamp: i64,
    datetime: String,
    pressure: f64,
    baseline: f64,
    residual: f64,
}

impl ResidualRow {
    fn new(sample: &PressureSample, baseline: f64, residual: f64) -> Self {
        Self {
            timestamp: sample.timestamp,
            datetime: sample
                .datetime()
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            pressure: sample.pressure_hpa,
            baseline,
            residual,
        }
    }
}

/// Writes the detrended series as one row per sample.
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_residuals(
        &self,
        series: &SampleSeries,
        residuals: &ResidualSeries,
        path: &Path,
    ) -> Result<usize> {
        if residuals.len() != series.len() {
            return Err(ProcessingError::Fit(format!(
                "{} residuals for {} samples",
                residuals.len(),
                series.len()
            )));
        }

        let mut writer = csv::Writer::from_path(path)?;
        for ((sample, baseline), residual) in series
            .samples()
            .iter()
            .zip(&residuals.baseline)
            .zip(&residuals.residual)
        {
            writer.serialize(ResidualRow::new(sample, *baseline, *residual))?;
        }
        writer.flush()?;

        info!("Wrote {} rows to {}", series.len(), path.display());
        Ok(series.len())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
