//! Volume-weighted indicators: VWAP and On-Balance Volume (OBV).
//!
//! VWAP accumulates from the first bar of the window. It does not reset per
//! session, so the same bars always give the same value regardless of date.

use super::check_parallel;
use crate::components::indicator::Indicator;
use crate::domain::{closes, highs, lows, volumes, Bar};
use crate::error::AnalysisError;

/// Cumulative `Σ(tp·v) / Σv`; reports the bar's typical price while the
/// cumulative volume is still zero.
pub fn vwap(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    volumes: &[f64],
) -> Result<Vec<f64>, AnalysisError> {
    let n = check_parallel(&[highs, lows, closes, volumes])?;
    let mut cum_pv = 0.0;
    let mut cum_v = 0.0;
    Ok((0..n)
        .map(|i| {
            let tp = (highs[i] + lows[i] + closes[i]) / 3.0;
            cum_pv += tp * volumes[i];
            cum_v += volumes[i];
            if cum_v == 0.0 {
                tp
            } else {
                cum_pv / cum_v
            }
        })
        .collect())
}

/// Running total seeded with `volumes[0]`: add on an up close, subtract on a
/// down close.
pub fn obv(closes: &[f64], volumes: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    let n = check_parallel(&[closes, volumes])?;
    let mut out = Vec::with_capacity(n);
    let Some(&first) = volumes.first() else {
        return Ok(out);
    };
    let mut total = first;
    out.push(total);
    for i in 1..n {
        if closes[i] > closes[i - 1] {
            total += volumes[i];
        } else if closes[i] < closes[i - 1] {
            total -= volumes[i];
        }
        out.push(total);
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy)]
pub struct Vwap;

impl Indicator for Vwap {
    fn name(&self) -> &str {
        "vwap"
    }

    fn warmup(&self) -> usize {
        1
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<(String, Vec<f64>)>, AnalysisError> {
        let series = vwap(&highs(bars), &lows(bars), &closes(bars), &volumes(bars))?;
        Ok(vec![("vwap".into(), series)])
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Obv;

impl Indicator for Obv {
    fn name(&self) -> &str {
        "obv"
    }

    fn warmup(&self) -> usize {
        1
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<(String, Vec<f64>)>, AnalysisError> {
        Ok(vec![("obv".into(), obv(&closes(bars), &volumes(bars))?)])
    }
}
