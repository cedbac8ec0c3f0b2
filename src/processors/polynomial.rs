use nalgebra::{DMatrix, DVector};

use crate::error::{ProcessingError, Result};

/// Least-squares polynomial on a centred and scaled abscissa, so the normal
/// equations stay well conditioned for epoch-sized inputs.
#[derive(Debug, Clone)]
pub struct Polynomial {
    coefficients: Vec<f64>, // lowest order first
    center: f64,
    scale: f64,
}

impl Polynomial {
    pub fn fit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(ProcessingError::Fit(format!(
                "{} abscissae but {} values",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() <= degree {
            return Err(ProcessingError::Fit(format!(
                "{} samples cannot determine a degree {} polynomial",
                xs.len(),
                degree
            )));
        }

        let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let center = (lo + hi) / 2.0;
        let scale = if hi > lo { (hi - lo) / 2.0 } else { 1.0 };

        let terms = degree + 1;
        let mut normal = DMatrix::<f64>::zeros(terms, terms);
        let mut rhs = DVector::<f64>::zeros(terms);
        let mut powers = vec![0.0; terms];
        for (&x, &y) in xs.iter().zip(ys) {
            let u = (x - center) / scale;
            let mut p = 1.0;
            for slot in powers.iter_mut() {
                *slot = p;
                p *= u;
            }
            for r in 0..terms {
                rhs[r] += powers[r] * y;
                for c in 0..terms {
                    normal[(r, c)] += powers[r] * powers[c];
                }
            }
        }

        let cholesky = normal.cholesky().ok_or_else(|| {
            ProcessingError::Fit(format!(
                "degree {} polynomial is not determined by the sample times",
                degree
            ))
        })?;
        let solution = cholesky.solve(&rhs);

        Ok(Self {
            coefficients: solution.iter().copied().collect(),
            center,
            scale,
        })
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let u = (x - self.center) / self.scale;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * u + c)
    }
}
