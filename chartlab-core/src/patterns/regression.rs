//! Ordinary least-squares line fit.

use serde::{Deserialize, Serialize};

use crate::indicators::negligible;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination. 1 when the points have no variance.
    pub r_squared: f64,
}

impl LinearFit {
    pub fn value_at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit `y = intercept + slope * x`.
///
/// `None` for fewer than two points, mismatched lengths, non-finite input
/// or when every `x` is the same.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }
    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let ss_tot: f64 = ys.iter().map(|y| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
        .sum();
    let r_squared = if negligible((ss_tot / n).sqrt(), mean_y) {
        1.0
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

/// Fit against `0, 1, 2, ...` as x.
pub fn linear_fit_series(ys: &[f64]) -> Option<LinearFit> {
    let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64).collect();
    linear_fit(&xs, ys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn exact_line() {
        let fit = linear_fit(&[0.0, 1.0, 2.0, 3.0], &[1.0, 3.0, 5.0, 7.0]).unwrap();
        assert_approx(fit.slope, 2.0, 1e-12);
        assert_approx(fit.intercept, 1.0, 1e-12);
        assert_approx(fit.r_squared, 1.0, 1e-12);
        assert_approx(fit.value_at(10.0), 21.0, 1e-12);
    }

    #[test]
    fn flat_points_have_full_r_squared() {
        let fit = linear_fit_series(&[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.r_squared, 1.0);
    }

    #[test]
    fn flat_points_at_inexact_level_have_full_r_squared() {
        for level in [0.1, 179.43] {
            let fit = linear_fit_series(&[level; 30]).unwrap();
            assert_eq!(fit.r_squared, 1.0, "level {level}");
            assert!(fit.slope.abs() < 1e-12);
        }
    }

    #[test]
    fn noisy_points_lower_r_squared() {
        let fit = linear_fit_series(&[1.0, 3.0, 2.0, 4.0]).unwrap();
        assert!(fit.r_squared > 0.0 && fit.r_squared < 1.0);
    }

    #[test]
    fn degenerate_inputs_are_none() {
        assert!(linear_fit(&[1.0], &[1.0]).is_none());
        assert!(linear_fit(&[2.0, 2.0], &[1.0, 3.0]).is_none());
        assert!(linear_fit(&[0.0, 1.0], &[1.0]).is_none());
        assert!(linear_fit(&[0.0, 1.0], &[1.0, f64::NAN]).is_none());
    }
}
