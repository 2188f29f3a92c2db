//! True range and Average True Range (ATR).
//!
//! True range needs the previous close, so it starts at the second bar:
//! `true_range` has `n - 1` values and `atr(period)` has `n - period`.

use super::{check_parallel, check_period, require_len, sma};
use crate::components::indicator::Indicator;
use crate::domain::{closes, highs, lows, Bar};
use crate::error::AnalysisError;

/// `max(high - low, |high - prev_close|, |low - prev_close|)` per bar.
pub fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    let n = check_parallel(&[highs, lows, closes])?;
    require_len(n, 2)?;
    Ok((1..n)
        .map(|i| {
            let prev_close = closes[i - 1];
            (highs[i] - lows[i])
                .max((highs[i] - prev_close).abs())
                .max((lows[i] - prev_close).abs())
        })
        .collect())
}

/// Simple average of the true range over `period` bars.
pub fn atr(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
) -> Result<Vec<f64>, AnalysisError> {
    check_period("atr", period)?;
    let n = check_parallel(&[highs, lows, closes])?;
    require_len(n, period + 1)?;
    sma(&true_range(highs, lows, closes)?, period)
}

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<(String, Vec<f64>)>, AnalysisError> {
        let series = atr(&highs(bars), &lows(bars), &closes(bars), self.period)?;
        Ok(vec![(self.name.clone(), series)])
    }
}
