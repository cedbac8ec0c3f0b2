use tracing::{debug, info};

use crate::error::{ProcessingError, Result};
use crate::models::{ResidualSeries, SampleSeries, TimeWindow};
use crate::processors::bspline::BSpline;
use crate::processors::knots::KnotPlan;
use crate::processors::polynomial::Polynomial;
use crate::settings::{DetrendMethod, DetrendSettings};
use crate::utils::constants::{SECONDS_PER_HOUR, SPLINE_DEGREE};

/// Slowly varying, weather-driven part of a pressure series.
pub trait Baseline {
    /// Baseline pressure (hPa) at a UTC epoch timestamp.
    fn value_at(&self, timestamp: f64) -> f64;

    /// Knot positions (epoch seconds) for diagnostic plotting.
    fn knots(&self) -> &[f64];

    fn method(&self) -> DetrendMethod;
}

/// Fits are done in hours since the first sample.
#[derive(Debug, Clone, Copy)]
struct TimeAxis {
    origin: f64,
}

impl TimeAxis {
    fn hours(&self, timestamp: f64) -> f64 {
        (timestamp - self.origin) / SECONDS_PER_HOUR as f64
    }
}

pub struct SplineBaseline {
    axis: TimeAxis,
    spline: BSpline,
    knots: Vec<f64>,
}

impl Baseline for SplineBaseline {
    fn value_at(&self, timestamp: f64) -> f64 {
        self.spline.evaluate(self.axis.hours(timestamp))
    }

    fn knots(&self) -> &[f64] {
        &self.knots
    }

    fn method(&self) -> DetrendMethod {
        DetrendMethod::Spline
    }
}

pub struct PolynomialBaseline {
    axis: TimeAxis,
    polynomial: Polynomial,
    knots: Vec<f64>,
}

impl Baseline for PolynomialBaseline {
    fn value_at(&self, timestamp: f64) -> f64 {
        self.polynomial.evaluate(self.axis.hours(timestamp))
    }

    fn knots(&self) -> &[f64] {
        &self.knots
    }

    fn method(&self) -> DetrendMethod {
        DetrendMethod::Polynomial
    }
}

/// Baseline together with the residual it leaves.
pub struct Detrended {
    pub baseline: Box<dyn Baseline>,
    pub residuals: ResidualSeries,
}

pub struct Detrender {
    method: DetrendMethod,
    smoothing_hours: f64,
    polynomial_degree: usize,
}

impl Detrender {
    pub fn new(smoothing_hours: f64) -> Self {
        Self {
            method: DetrendMethod::Spline,
            smoothing_hours,
            polynomial_degree: 2,
        }
    }

    pub fn from_settings(settings: &DetrendSettings) -> Self {
        Self {
            method: settings.method,
            smoothing_hours: settings.smoothing_hours,
            polynomial_degree: settings.polynomial_degree,
        }
    }

    pub fn with_polynomial(mut self, degree: usize) -> Self {
        self.method = DetrendMethod::Polynomial;
        self.polynomial_degree = degree;
        self
    }

    /// Checked before any data is fetched, so a bad smoothing interval fails
    /// fast.
    ///
    /// A polynomial baseline has no knots of its own; when the window is too
    /// short for a plan it only marks the sample endpoints.
    pub fn knot_plan(&self, window: &TimeWindow) -> Result<KnotPlan> {
        match (KnotPlan::for_window(window, self.smoothing_hours), self.method) {
            (Err(_), DetrendMethod::Polynomial) => Ok(KnotPlan::endpoints()),
            (plan, _) => plan,
        }
    }

    pub fn fit(&self, series: &SampleSeries, window: &TimeWindow) -> Result<Box<dyn Baseline>> {
        let plan = self.knot_plan(window)?;
        let (first, last) = series.time_span().ok_or_else(|| {
            ProcessingError::Fit("cannot fit a baseline to an empty series".to_string())
        })?;

        let plan = match (plan.check_samples(series.len(), SPLINE_DEGREE), self.method) {
            (Ok(()), _) => plan,
            (Err(_), DetrendMethod::Polynomial) => KnotPlan::endpoints(),
            (Err(e), DetrendMethod::Spline) => return Err(e),
        };

        let axis = TimeAxis {
            origin: first as f64,
        };
        let xs: Vec<f64> = series.timestamps().map(|t| axis.hours(t)).collect();
        let ys: Vec<f64> = series.pressures().collect();
        let knots = plan.positions(first as f64, last as f64);

        debug!(
            method = ?self.method,
            samples = xs.len(),
            knots = knots.len(),
            "Fitting baseline"
        );

        let baseline: Box<dyn Baseline> = match self.method {
            DetrendMethod::Spline => {
                let interior: Vec<f64> = plan
                    .interior_positions(first as f64, last as f64)
                    .into_iter()
                    .map(|t| axis.hours(t))
                    .collect();
                let spline = BSpline::fit(&xs, &ys, &interior, SPLINE_DEGREE)?;
                Box::new(SplineBaseline {
                    axis,
                    spline,
                    knots,
                })
            }
            DetrendMethod::Polynomial => {
                let polynomial = Polynomial::fit(&xs, &ys, self.polynomial_degree)?;
                Box::new(PolynomialBaseline {
                    axis,
                    polynomial,
                    knots,
                })
            }
        };

        Ok(baseline)
    }

    /// Observed minus baseline at every sample.
    pub fn residuals(baseline: &dyn Baseline, series: &SampleSeries) -> ResidualSeries {
        let fitted: Vec<f64> = series.timestamps().map(|t| baseline.value_at(t)).collect();
        let residual = series
            .pressures()
            .zip(&fitted)
            .map(|(observed, base)| observed - base)
            .collect();

        ResidualSeries {
            baseline: fitted,
            residual,
        }
    }

    pub fn detrend(&self, series: &SampleSeries, window: &TimeWindow) -> Result<Detrended> {
        let baseline = self.fit(series, window)?;
        let residuals = Self::residuals(baseline.as_ref(), series);

        if let Some((index, peak)) = residuals.peak() {
            info!(
                "Largest extracted feature {:+.3} hPa at {}",
                peak,
                series.samples()[index].timestamp
            );
        }

        Ok(Detrended {
            baseline,
            residuals,
        })
    }
}
