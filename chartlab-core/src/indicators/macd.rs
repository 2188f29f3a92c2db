//! Moving Average Convergence Divergence (MACD).
//!
//! `macd = EMA(fast) - EMA(slow)`, aligned on the slow EMA's tail.
//! `signal = EMA(macd, signal_period)` and `histogram = macd - signal`,
//! aligned on the signal's tail.

use serde::{Deserialize, Serialize};

use super::{check_finite, check_period, ema, require_len};
use crate::components::indicator::Indicator;
use crate::domain::{closes, Bar};
use crate::error::AnalysisError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// Length `n - slow + 1`.
    pub macd: Vec<f64>,
    /// Length `n - slow - signal + 2`.
    pub signal: Vec<f64>,
    /// Same length as `signal`.
    pub histogram: Vec<f64>,
}

pub fn macd(
    values: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<MacdOutput, AnalysisError> {
    check_period("macd_fast", fast)?;
    check_period("macd_slow", slow)?;
    check_period("macd_signal", signal)?;
    if fast >= slow {
        return Err(AnalysisError::InvalidPeriod {
            name: "macd_fast",
            period: fast,
        });
    }
    require_len(values.len(), slow + signal - 1)?;
    check_finite(values)?;

    let fast_ema = ema(values, fast)?;
    let slow_ema = ema(values, slow)?;
    let skip = fast_ema.len() - slow_ema.len();

    let macd_line: Vec<f64> = fast_ema[skip..]
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = ema(&macd_line, signal)?;
    let tail = &macd_line[macd_line.len() - signal_line.len()..];
    let histogram = tail.iter().zip(&signal_line).map(|(m, s)| m - s).collect();

    Ok(MacdOutput {
        macd: macd_line,
        signal: signal_line,
        histogram,
    })
}

/// Publishes `macd`, `macd_signal` and `macd_histogram`.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self { fast, slow, signal }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        "macd"
    }

    fn warmup(&self) -> usize {
        self.slow + self.signal - 1
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<(String, Vec<f64>)>, AnalysisError> {
        let out = macd(&closes(bars), self.fast, self.slow, self.signal)?;
        Ok(vec![
            ("macd".into(), out.macd),
            ("macd_signal".into(), out.signal),
            ("macd_histogram".into(), out.histogram),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 4.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn macd_lengths() {
        let out = macd(&wave(60), 12, 26, 9).unwrap();
        assert_eq!(out.macd.len(), 35);
        assert_eq!(out.signal.len(), 27);
        assert_eq!(out.histogram.len(), 27);
    }

    #[test]
    fn histogram_is_macd_minus_signal() {
        let out = macd(&wave(80), 12, 26, 9).unwrap();
        let offset = out.macd.len() - out.signal.len();
        for (i, h) in out.histogram.iter().enumerate() {
            assert_approx(*h, out.macd[offset + i] - out.signal[i], 1e-12);
        }
    }

    #[test]
    fn macd_of_constant_is_zero() {
        let out = macd(&[10.0; 40], 12, 26, 9).unwrap();
        assert!(out.macd.iter().all(|v| v.abs() < 1e-12));
        assert!(out.histogram.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn fast_must_be_shorter_than_slow() {
        assert!(matches!(
            macd(&wave(60), 26, 12, 9),
            Err(AnalysisError::InvalidPeriod {
                name: "macd_fast",
                ..
            })
        ));
    }

    #[test]
    fn macd_needs_slow_plus_signal_minus_one() {
        assert!(macd(&wave(33), 12, 26, 9).unwrap_err().is_insufficient_data());
        assert_eq!(macd(&wave(34), 12, 26, 9).unwrap().signal.len(), 1);
    }
}
