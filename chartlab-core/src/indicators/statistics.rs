//! Descriptive statistics over trailing windows.

use super::{check_finite, check_period, negligible, require_len};
use crate::error::AnalysisError;

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Population standard deviation of every trailing `period` window.
pub fn rolling_std_dev(values: &[f64], period: usize) -> Result<Vec<f64>, AnalysisError> {
    check_period("rolling_std_dev", period)?;
    require_len(values.len(), period)?;
    check_finite(values)?;
    Ok(values.windows(period).map(population_std_dev).collect())
}

/// Z-score of the last value against the trailing `period` window.
///
/// A window with zero dispersion (up to rounding) has z = 0.
pub fn z_score(values: &[f64], period: usize) -> Result<f64, AnalysisError> {
    check_period("z_score", period)?;
    require_len(values.len(), period)?;
    let window = &values[values.len() - period..];
    check_finite(window)?;

    let m = mean(window);
    let sd = population_std_dev(window);
    if negligible(sd, m) {
        return Ok(0.0);
    }
    let last = window[period - 1];
    Ok((last - m) / sd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn population_std_of_known_set() {
        // Classic example: mean 5, population sd 2
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_approx(mean(&v), 5.0, DEFAULT_EPSILON);
        assert_approx(population_std_dev(&v), 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rolling_std_length() {
        let v: Vec<f64> = (0..10).map(f64::from).collect();
        assert_eq!(rolling_std_dev(&v, 4).unwrap().len(), 7);
    }

    #[test]
    fn z_score_of_flat_window_is_zero() {
        assert_eq!(z_score(&[3.0; 20], 10).unwrap(), 0.0);
    }

    #[test]
    fn z_score_of_inexact_flat_window_is_zero() {
        assert_eq!(z_score(&[0.1; 50], 20).unwrap(), 0.0);
        assert_eq!(z_score(&[179.43; 50], 20).unwrap(), 0.0);
    }

    #[test]
    fn z_score_uses_trailing_window() {
        let v = [100.0, 1.0, 2.0, 3.0];
        // window [1,2,3]: mean 2, sd sqrt(2/3)
        let z = z_score(&v, 3).unwrap();
        assert_approx(z, 1.0 / (2.0f64 / 3.0).sqrt(), 1e-12);
    }

    #[test]
    fn empty_slice_statistics_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(population_std_dev(&[]), 0.0);
    }
}
