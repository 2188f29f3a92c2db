//! Stochastic oscillator (%K / %D) and Williams %R.
//!
//! Both compare the close with the highest high and lowest low of a
//! trailing window. A window with zero range has no meaningful position,
//! so %K reports 50 and %R reports -50 there.

use serde::{Deserialize, Serialize};

use super::{check_parallel, check_period, require_len, sma, window_extremes};
use crate::components::indicator::Indicator;
use crate::domain::{closes, highs, lows, Bar};
use crate::error::AnalysisError;

/// %K and its `d_period` SMA %D, each suffix-aligned to the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochasticOutput {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

/// Raw position of each close within its trailing `period` range, 0..=100.
fn percent_k(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    (period - 1..closes.len())
        .map(|i| {
            let start = i + 1 - period;
            let (hh, ll) = window_extremes(&highs[start..=i], &lows[start..=i]);
            let range = hh - ll;
            if range == 0.0 {
                50.0
            } else {
                (closes[i] - ll) / range * 100.0
            }
        })
        .collect()
}

pub fn stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_period: usize,
    d_period: usize,
) -> Result<StochasticOutput, AnalysisError> {
    check_period("stochastic_k", k_period)?;
    check_period("stochastic_d", d_period)?;
    let n = check_parallel(&[highs, lows, closes])?;
    require_len(n, k_period + d_period - 1)?;

    let k = percent_k(highs, lows, closes, k_period);
    let d = sma(&k, d_period)?;
    Ok(StochasticOutput { k, d })
}

/// Williams %R in `[-100, 0]`: `(hh - close) / (hh - ll) * -100`.
pub fn williams_r(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
) -> Result<Vec<f64>, AnalysisError> {
    check_period("williams_r", period)?;
    let n = check_parallel(&[highs, lows, closes])?;
    require_len(n, period)?;

    Ok((period - 1..n)
        .map(|i| {
            let start = i + 1 - period;
            let (hh, ll) = window_extremes(&highs[start..=i], &lows[start..=i]);
            let range = hh - ll;
            if range == 0.0 {
                -50.0
            } else {
                (hh - closes[i]) / range * -100.0
            }
        })
        .collect())
}

/// Publishes `stoch_k` and `stoch_d`.
#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize) -> Self {
        Self { k_period, d_period }
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        "stochastic"
    }

    fn warmup(&self) -> usize {
        self.k_period + self.d_period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<(String, Vec<f64>)>, AnalysisError> {
        let out = stochastic(
            &highs(bars),
            &lows(bars),
            &closes(bars),
            self.k_period,
            self.d_period,
        )?;
        Ok(vec![("stoch_k".into(), out.k), ("stoch_d".into(), out.d)])
    }
}

#[derive(Debug, Clone)]
pub struct WilliamsR {
    period: usize,
    name: String,
}

impl WilliamsR {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("williams_r_{period}"),
        }
    }
}

impl Indicator for WilliamsR {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<(String, Vec<f64>)>, AnalysisError> {
        let series = williams_r(&highs(bars), &lows(bars), &closes(bars), self.period)?;
        Ok(vec![(self.name.clone(), series)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn stochastic_lengths() {
        let h: Vec<f64> = (0..20).map(|i| 11.0 + i as f64).collect();
        let l: Vec<f64> = (0..20).map(|i| 9.0 + i as f64).collect();
        let c: Vec<f64> = (0..20).map(|i| 10.0 + i as f64).collect();
        let out = stochastic(&h, &l, &c, 14, 3).unwrap();
        assert_eq!(out.k.len(), 7);
        assert_eq!(out.d.len(), 5);
    }

    #[test]
    fn stochastic_known_value() {
        let h = [10.0, 12.0, 14.0];
        let l = [8.0, 9.0, 10.0];
        let c = [9.0, 11.0, 11.0];
        let out = stochastic(&h, &l, &c, 3, 1).unwrap();
        // hh = 14, ll = 8, close 11 → 50
        assert_approx(out.k[0], 50.0, DEFAULT_EPSILON);
        assert_eq!(out.d, out.k);
    }

    #[test]
    fn stochastic_zero_range_is_50() {
        let flat = [7.0; 10];
        let out = stochastic(&flat, &flat, &flat, 5, 3).unwrap();
        assert!(out.k.iter().all(|&v| v == 50.0));
        assert!(out.d.iter().all(|&v| v == 50.0));
    }

    #[test]
    fn stochastic_needs_k_plus_d_minus_one() {
        let v = [1.0; 15];
        assert!(stochastic(&v, &v, &v, 14, 3)
            .unwrap_err()
            .is_insufficient_data());
        let v = [1.0; 16];
        assert!(stochastic(&v, &v, &v, 14, 3).is_ok());
    }

    #[test]
    fn williams_r_bounds_and_flat_default() {
        let h = [10.0, 12.0, 14.0];
        let l = [8.0, 9.0, 10.0];
        let c = [9.0, 11.0, 14.0];
        let out = williams_r(&h, &l, &c, 3).unwrap();
        assert_approx(out[0], 0.0, DEFAULT_EPSILON);

        let flat = [5.0; 4];
        let out = williams_r(&flat, &flat, &flat, 2).unwrap();
        assert_eq!(out, vec![-50.0; 3]);
    }

    #[test]
    fn mismatched_slices_are_rejected() {
        assert!(matches!(
            williams_r(&[1.0, 2.0], &[1.0], &[1.0, 2.0], 1),
            Err(AnalysisError::LengthMismatch { .. })
        ));
    }
}
