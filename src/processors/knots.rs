use crate::error::{ProcessingError, Result};
use crate::models::TimeWindow;

/// Evenly spaced spline knots, one every `smoothing_hours` of query window.
///
/// The knots span the sampled time range end to end. The first and last
/// coincide with the clamped boundary knots the B-spline adds itself, so they
/// are never passed to the fit; they are kept for plotting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnotPlan {
    count: usize,
}

impl KnotPlan {
    /// Smallest plan that still leaves one interior knot.
    pub const MIN_COUNT: usize = 3;

    pub fn for_window(window: &TimeWindow, smoothing_hours: f64) -> Result<Self> {
        let window_hours = window.duration_hours();
        let count = (window_hours / smoothing_hours).floor();

        if !count.is_finite() || count < Self::MIN_COUNT as f64 {
            return Err(ProcessingError::InvalidParameter {
                parameter: "detrend.smoothing_hours",
                message: format!(
                    "smoothing length of {:.1} hours is too long for a curve fit over a {:.0} hour window. Try {:.1} hours or less.",
                    smoothing_hours,
                    window_hours,
                    window_hours / Self::MIN_COUNT as f64
                ),
            });
        }

        Ok(Self {
            count: count as usize,
        })
    }

    /// Just the first and last sample, no interior knots.
    pub fn endpoints() -> Self {
        Self { count: 2 }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn interior_count(&self) -> usize {
        self.count - 2
    }

    /// Reject plans with more spline coefficients than samples, before any
    /// knot positions are allocated.
    pub fn check_samples(&self, samples: usize, degree: usize) -> Result<()> {
        let coefficients = self.interior_count().saturating_add(degree + 1);
        if coefficients > samples {
            return Err(ProcessingError::InvalidParameter {
                parameter: "detrend.smoothing_hours",
                message: format!(
                    "{} knots need at least {} samples but only {} were read; use a longer smoothing interval",
                    self.count, coefficients, samples
                ),
            });
        }
        Ok(())
    }

    /// All knot positions over `[first, last]`, endpoints included.
    pub fn positions(&self, first: f64, last: f64) -> Vec<f64> {
        let step = (last - first) / (self.count - 1) as f64;
        (0..self.count)
            .map(|i| {
                if i == self.count - 1 {
                    last
                } else {
                    first + step * i as f64
                }
            })
            .collect()
    }

    /// Positions handed to the spline fit.
    pub fn interior_positions(&self, first: f64, last: f64) -> Vec<f64> {
        let all = self.positions(first, last);
        all[1..all.len() - 1].to_vec()
    }
}
