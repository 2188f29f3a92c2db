//! Relative Strength Index (RSI) with Wilder smoothing.
//!
//! The first `period` price changes seed the average gain/loss, after which
//! `avg = (avg * (period - 1) + current) / period`. Output length is
//! `n - period`; `out[j]` is the RSI at input index `j + period`.

use super::{check_finite, check_period, require_len};
use crate::components::indicator::Indicator;
use crate::domain::{closes, Bar};
use crate::error::AnalysisError;

pub fn rsi(values: &[f64], period: usize) -> Result<Vec<f64>, AnalysisError> {
    check_period("rsi", period)?;
    require_len(values.len(), period + 1)?;
    check_finite(values)?;

    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let p = period as f64;

    let mut avg_gain = deltas[..period].iter().map(|d| d.max(0.0)).sum::<f64>() / p;
    let mut avg_loss = deltas[..period].iter().map(|d| (-d).max(0.0)).sum::<f64>() / p;

    let mut result = Vec::with_capacity(values.len() - period);
    result.push(rsi_value(avg_gain, avg_loss));

    for &d in &deltas[period..] {
        avg_gain = (avg_gain * (p - 1.0) + d.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-d).max(0.0)) / p;
        result.push(rsi_value(avg_gain, avg_loss));
    }
    Ok(result)
}

/// 50 for a window with no movement at all, 100 when nothing was lost.
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return 50.0;
        }
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<(String, Vec<f64>)>, AnalysisError> {
        Ok(vec![(self.name.clone(), rsi(&closes(bars), self.period)?)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn rsi_length_is_n_minus_period() {
        let v: Vec<f64> = (0..30).map(|i| 100.0 + (i % 4) as f64).collect();
        assert_eq!(rsi(&v, 14).unwrap().len(), 16);
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let v: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        for x in rsi(&v, 14).unwrap() {
            assert_approx(x, 100.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let v: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        for x in rsi(&v, 14).unwrap() {
            assert_approx(x, 0.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn rsi_flat_is_neutral() {
        for x in rsi(&[50.0; 20], 14).unwrap() {
            assert_eq!(x, 50.0);
        }
    }

    #[test]
    fn rsi_equal_gain_and_loss_is_50() {
        // Alternating +1 / -1 with period 2: avg_gain == avg_loss
        let v = [10.0, 11.0, 10.0];
        let out = rsi(&v, 2).unwrap();
        assert_approx(out[0], 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_needs_period_plus_one_values() {
        assert!(rsi(&[1.0; 14], 14).unwrap_err().is_insufficient_data());
        assert_eq!(rsi(&[1.0; 15], 14).unwrap().len(), 1);
    }

    #[test]
    fn rsi_is_bounded() {
        let v: Vec<f64> = (0..100)
            .map(|i| 100.0 + ((i * 37) % 11) as f64 - 5.0)
            .collect();
        for x in rsi(&v, 14).unwrap() {
            assert!((0.0..=100.0).contains(&x), "rsi out of range: {x}");
        }
    }
}
