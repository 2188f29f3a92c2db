//! Bollinger Bands: SMA middle band ± `k` population standard deviations.

use serde::{Deserialize, Serialize};

use super::statistics::population_std_dev;
use super::{check_finite, check_period, require_len};
use crate::components::indicator::Indicator;
use crate::domain::{closes, Bar};
use crate::error::AnalysisError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger_bands(
    values: &[f64],
    period: usize,
    k: f64,
) -> Result<BollingerOutput, AnalysisError> {
    check_period("bollinger", period)?;
    if !k.is_finite() || k < 0.0 {
        return Err(AnalysisError::InvalidParameter {
            name: "bollinger_std_dev",
            value: k,
        });
    }
    require_len(values.len(), period)?;
    check_finite(values)?;

    let len = values.len() - period + 1;
    let mut out = BollingerOutput {
        upper: Vec::with_capacity(len),
        middle: Vec::with_capacity(len),
        lower: Vec::with_capacity(len),
    };
    for window in values.windows(period) {
        let mid = window.iter().sum::<f64>() / period as f64;
        let sd = population_std_dev(window);
        out.upper.push(mid + k * sd);
        out.middle.push(mid);
        out.lower.push(mid - k * sd);
    }
    Ok(out)
}

/// Publishes `bb_upper`, `bb_middle` and `bb_lower`.
#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    std_dev: f64,
}

impl Bollinger {
    pub fn new(period: usize, std_dev: f64) -> Self {
        Self { period, std_dev }
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        "bollinger"
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<(String, Vec<f64>)>, AnalysisError> {
        let out = bollinger_bands(&closes(bars), self.period, self.std_dev)?;
        Ok(vec![
            ("bb_upper".into(), out.upper),
            ("bb_middle".into(), out.middle),
            ("bb_lower".into(), out.lower),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::statistics::rolling_std_dev;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn band_width_is_two_k_sigma() {
        let v: Vec<f64> = (0..40).map(|i| 50.0 + ((i * 7) % 5) as f64).collect();
        let k = 2.5;
        let out = bollinger_bands(&v, 20, k).unwrap();
        let sds = rolling_std_dev(&v, 20).unwrap();
        for i in 0..out.middle.len() {
            assert_approx(out.upper[i] - out.lower[i], 2.0 * k * sds[i], 1e-9);
        }
    }

    #[test]
    fn flat_series_collapses_bands() {
        let out = bollinger_bands(&[3.0; 25], 20, 2.0).unwrap();
        assert_eq!(out.middle.len(), 6);
        for i in 0..6 {
            assert_approx(out.upper[i], 3.0, DEFAULT_EPSILON);
            assert_approx(out.lower[i], 3.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn negative_multiplier_rejected() {
        assert!(matches!(
            bollinger_bands(&[1.0; 5], 3, -1.0),
            Err(AnalysisError::InvalidParameter { .. })
        ));
    }
}
