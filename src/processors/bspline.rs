use nalgebra::{DMatrix, DVector};

use crate::error::{ProcessingError, Result};

/// Clamped B-spline fitted by linear least squares.
///
/// The full knot vector repeats each domain end `degree + 1` times around the
/// caller's interior knots, so the curve is defined on exactly
/// `[first, last]` of the data it was fitted to.
#[derive(Debug, Clone)]
pub struct BSpline {
    degree: usize,
    knots: Vec<f64>,
    coefficients: Vec<f64>,
}

impl BSpline {
    /// Least-squares fit through `(xs, ys)`. `xs` must be ascending and
    /// `interior` strictly inside `(xs[0], xs[n-1])` and ascending.
    pub fn fit(xs: &[f64], ys: &[f64], interior: &[f64], degree: usize) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(ProcessingError::Fit(format!(
                "{} abscissae but {} values",
                xs.len(),
                ys.len()
            )));
        }
        let (lo, hi) = match (xs.first(), xs.last()) {
            (Some(&lo), Some(&hi)) if hi > lo => (lo, hi),
            _ => {
                return Err(ProcessingError::Fit(
                    "need samples spanning a non-zero time range".to_string(),
                ))
            }
        };
        if interior.windows(2).any(|pair| pair[1] <= pair[0])
            || interior.iter().any(|&k| k <= lo || k >= hi)
        {
            return Err(ProcessingError::Fit(
                "interior knots must be increasing and inside the sample range".to_string(),
            ));
        }

        let knots = clamped_knots(lo, hi, interior, degree);
        let n_coef = knots.len() - degree - 1;
        if xs.len() < n_coef {
            return Err(ProcessingError::Fit(format!(
                "{} samples cannot determine {} spline coefficients",
                xs.len(),
                n_coef
            )));
        }

        // Normal equations: (BᵀB) c = Bᵀy, B is banded so only degree+1
        // entries per row are non-zero.
        let mut normal = DMatrix::<f64>::zeros(n_coef, n_coef);
        let mut rhs = DVector::<f64>::zeros(n_coef);
        let mut basis = vec![0.0; degree + 1];
        for (&x, &y) in xs.iter().zip(ys) {
            let span = find_span(&knots, degree, n_coef, x);
            basis_functions(&knots, degree, span, x, &mut basis);
            let offset = span - degree;
            for (r, &br) in basis.iter().enumerate() {
                rhs[offset + r] += br * y;
                for (c, &bc) in basis.iter().enumerate() {
                    normal[(offset + r, offset + c)] += br * bc;
                }
            }
        }

        let cholesky = normal.cholesky().ok_or_else(|| {
            ProcessingError::Fit(
                "spline system is singular: some knot intervals hold too few samples".to_string(),
            )
        })?;
        let solution = cholesky.solve(&rhs);

        Ok(Self {
            degree,
            knots,
            coefficients: solution.iter().copied().collect(),
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Value at `x`; points outside the fitted range use the end polynomial
    /// pieces.
    pub fn evaluate(&self, x: f64) -> f64 {
        let mut basis = vec![0.0; self.degree + 1];
        let span = find_span(&self.knots, self.degree, self.coefficients.len(), x);
        basis_functions(&self.knots, self.degree, span, x, &mut basis);
        let offset = span - self.degree;
        basis
            .iter()
            .enumerate()
            .map(|(j, b)| b * self.coefficients[offset + j])
            .sum()
    }
}

fn clamped_knots(lo: f64, hi: f64, interior: &[f64], degree: usize) -> Vec<f64> {
    let mut knots = Vec::with_capacity(interior.len() + 2 * (degree + 1));
    knots.extend(std::iter::repeat(lo).take(degree + 1));
    knots.extend_from_slice(interior);
    knots.extend(std::iter::repeat(hi).take(degree + 1));
    knots
}

/// Index `i` with `knots[i] <= x < knots[i + 1]`, clamped to the valid spans.
fn find_span(knots: &[f64], degree: usize, n_coef: usize, x: f64) -> usize {
    if x >= knots[n_coef] {
        return n_coef - 1;
    }
    if x <= knots[degree] {
        return degree;
    }
    // first knot strictly greater than x, minus one
    let upper = knots[degree..=n_coef].partition_point(|&k| k <= x) + degree;
    upper - 1
}

/// The `degree + 1` non-vanishing basis functions on `span` (Cox-de Boor).
fn basis_functions(knots: &[f64], degree: usize, span: usize, x: f64, out: &mut [f64]) {
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    out[0] = 1.0;
    for j in 1..=degree {
        left[j] = x - knots[span + 1 - j];
        right[j] = knots[span + j] - x;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = out[r] / (right[r + 1] + left[j - r]);
            out[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        out[j] = saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize, lo: f64, hi: f64) -> Vec<f64> {
        (0..n)
            .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
            .collect()
    }

    #[test]
    fn test_basis_partition_of_unity() {
        let knots = clamped_knots(0.0, 10.0, &[2.0, 5.0, 7.5], 3);
        let n_coef = knots.len() - 4;
        let mut basis = vec![0.0; 4];
        for x in grid(41, 0.0, 10.0) {
            let span = find_span(&knots, 3, n_coef, x);
            basis_functions(&knots, 3, span, x, &mut basis);
            let total: f64 = basis.iter().sum();
            assert!((total - 1.0).abs() < 1e-12, "sum {} at {}", total, x);
            assert!(basis.iter().all(|b| *b >= -1e-15));
        }
    }

    #[test]
    fn test_find_span_edges() {
        let knots = clamped_knots(0.0, 10.0, &[5.0], 3);
        let n_coef = knots.len() - 4;
        assert_eq!(find_span(&knots, 3, n_coef, 0.0), 3);
        assert_eq!(find_span(&knots, 3, n_coef, 4.99), 3);
        assert_eq!(find_span(&knots, 3, n_coef, 5.0), 4);
        assert_eq!(find_span(&knots, 3, n_coef, 10.0), 4);
        assert_eq!(find_span(&knots, 3, n_coef, 12.0), 4);
    }

    #[test]
    fn test_cubic_reproduced_exactly() {
        let xs = grid(200, 0.0, 36.0);
        let f = |x: f64| 1013.0 + 0.2 * x - 0.01 * x * x + 0.0003 * x * x * x;
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();

        let spline = BSpline::fit(&xs, &ys, &[9.0, 18.0, 27.0], 3).unwrap();
        for &x in &xs {
            assert!((spline.evaluate(x) - f(x)).abs() < 1e-7);
        }
        assert_eq!(spline.coefficients().len(), 7);
        assert_eq!(spline.degree(), 3);
    }

    #[test]
    fn test_interval_without_samples_is_singular() {
        // Two clusters with a hole spanning several knot intervals
        let mut xs = grid(20, 0.0, 1.0);
        xs.extend(grid(20, 9.0, 10.0));
        let ys = vec![1.0; xs.len()];

        let interior = [2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let result = BSpline::fit(&xs, &ys, &interior, 3);
        assert!(matches!(result, Err(ProcessingError::Fit(_))));
    }

    #[test]
    fn test_rejects_bad_knots() {
        let xs = grid(50, 0.0, 10.0);
        let ys = vec![0.0; 50];
        assert!(BSpline::fit(&xs, &ys, &[0.0, 5.0], 3).is_err());
        assert!(BSpline::fit(&xs, &ys, &[6.0, 5.0], 3).is_err());
        assert!(BSpline::fit(&xs, &ys[..10], &[5.0], 3).is_err());
    }
}
