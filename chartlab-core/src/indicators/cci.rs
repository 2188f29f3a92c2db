//! Commodity Channel Index (CCI).
//!
//! `(TP - SMA(TP)) / (0.015 * mean absolute deviation)` over typical prices.
//! A window with zero deviation reports 0.

use super::{check_parallel, check_period, negligible, or_neutral, require_len};
use crate::components::indicator::Indicator;
use crate::domain::{closes, highs, lows, Bar};
use crate::error::AnalysisError;

const LAMBERT: f64 = 0.015;

pub fn cci(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
) -> Result<Vec<f64>, AnalysisError> {
    check_period("cci", period)?;
    let n = check_parallel(&[highs, lows, closes])?;
    require_len(n, period)?;

    let typical: Vec<f64> = (0..n)
        .map(|i| (highs[i] + lows[i] + closes[i]) / 3.0)
        .collect();

    Ok(typical
        .windows(period)
        .map(|w| {
            let mean = w.iter().sum::<f64>() / period as f64;
            let mad = w.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / period as f64;
            if negligible(mad, mean) {
                return 0.0;
            }
            let last = w[period - 1];
            or_neutral((last - mean) / (LAMBERT * mad), 0.0)
        })
        .collect())
}

#[derive(Debug, Clone)]
pub struct Cci {
    period: usize,
    name: String,
}

impl Cci {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("cci_{period}"),
        }
    }
}

impl Indicator for Cci {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<(String, Vec<f64>)>, AnalysisError> {
        let series = cci(&highs(bars), &lows(bars), &closes(bars), self.period)?;
        Ok(vec![(self.name.clone(), series)])
    }
}
