//! Moving averages: simple (SMA), exponential (EMA) and linearly weighted (WMA).
//!
//! All three truncate the warm-up: output length is `n - period + 1` and
//! `out[j]` covers input `values[j..j + period]`.

use super::{check_finite, check_period, require_len};
use crate::components::indicator::Indicator;
use crate::domain::{closes, Bar};
use crate::error::AnalysisError;

/// Rolling mean over `period` values.
pub fn sma(values: &[f64], period: usize) -> Result<Vec<f64>, AnalysisError> {
    check_period("sma", period)?;
    require_len(values.len(), period)?;
    check_finite(values)?;

    let mut result = Vec::with_capacity(values.len() - period + 1);
    let mut sum: f64 = values[..period].iter().sum();
    result.push(sum / period as f64);

    // Roll the window forward
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        result.push(sum / period as f64);
    }
    Ok(result)
}

/// Exponential moving average, `k = 2 / (period + 1)`, seeded with the SMA of
/// the first `period` values.
///
/// Each step is `prev + k * (price - prev)`, the rearranged form of
/// `price * k + prev * (1 - k)`. The two agree up to rounding, but this one
/// cannot drift away from a constant input.
pub fn ema(values: &[f64], period: usize) -> Result<Vec<f64>, AnalysisError> {
    check_period("ema", period)?;
    require_len(values.len(), period)?;
    check_finite(values)?;

    let k = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;

    let mut result = Vec::with_capacity(values.len() - period + 1);
    result.push(seed);
    let mut prev = seed;
    for &price in &values[period..] {
        prev += k * (price - prev);
        result.push(prev);
    }
    Ok(result)
}

/// Weighted moving average with weights `1..=period`, newest heaviest.
pub fn wma(values: &[f64], period: usize) -> Result<Vec<f64>, AnalysisError> {
    check_period("wma", period)?;
    require_len(values.len(), period)?;
    check_finite(values)?;

    let denom = (period * (period + 1)) as f64 / 2.0;
    Ok(values
        .windows(period)
        .map(|w| {
            w.iter()
                .enumerate()
                .map(|(i, v)| v * (i + 1) as f64)
                .sum::<f64>()
                / denom
        })
        .collect())
}

macro_rules! close_average {
    ($(#[$doc:meta])* $ty:ident, $func:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $ty {
            period: usize,
            name: String,
        }

        impl $ty {
            pub fn new(period: usize) -> Self {
                Self {
                    period,
                    name: format!(concat!($prefix, "_{}"), period),
                }
            }
        }

        impl Indicator for $ty {
            fn name(&self) -> &str {
                &self.name
            }

            fn warmup(&self) -> usize {
                self.period
            }

            fn compute(&self, bars: &[Bar]) -> Result<Vec<(String, Vec<f64>)>, AnalysisError> {
                let series = $func(&closes(bars), self.period)?;
                Ok(vec![(self.name.clone(), series)])
            }
        }
    };
}

close_average!(
    /// SMA of closes, published as `sma_{period}`.
    Sma, sma, "sma"
);
close_average!(
    /// EMA of closes, published as `ema_{period}`.
    Ema, ema, "ema"
);
close_average!(Wma, wma, "wma");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn sma_5_basic() {
        let result = sma(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0], 5).unwrap();
        assert_eq!(result.len(), 3);
        // SMA[0] = mean(10,11,12,13,14) = 12.0
        assert_approx(result[0], 12.0, DEFAULT_EPSILON);
        assert_approx(result[1], 13.0, DEFAULT_EPSILON);
        assert_approx(result[2], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_identity() {
        let result = sma(&[100.0, 200.0, 300.0], 1).unwrap();
        assert_eq!(result, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn sma_rejects_short_input() {
        let err = sma(&[1.0, 2.0], 3).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientData {
                required: 3,
                available: 2
            }
        ));
    }

    #[test]
    fn sma_rejects_zero_period() {
        assert!(matches!(
            sma(&[1.0], 0),
            Err(AnalysisError::InvalidPeriod { name: "sma", .. })
        ));
    }

    #[test]
    fn ema_seed_and_recurrence() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let result = ema(&values, 3).unwrap();
        assert_eq!(result.len(), 3);
        // seed = mean(1,2,3) = 2, k = 0.5
        assert_approx(result[0], 2.0, DEFAULT_EPSILON);
        assert_approx(result[1], 3.0, DEFAULT_EPSILON);
        assert_approx(result[2], 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_of_constant_is_constant() {
        let result = ema(&[42.0; 30], 10).unwrap();
        assert_eq!(result.len(), 21);
        for v in result {
            assert_approx(v, 42.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn ema_of_inexact_constant_does_not_drift() {
        let result = ema(&[179.43; 200], 12).unwrap();
        for v in &result {
            assert!((v - 179.43).abs() <= 179.43 * 1e-14, "{v}");
        }
        let last = result[result.len() - 1];
        assert_eq!(result[result.len() - 2], last);
    }

    #[test]
    fn wma_weights_newest_heaviest() {
        // (1*1 + 2*2 + 3*3) / 6 = 14/6
        let result = wma(&[1.0, 2.0, 3.0], 3).unwrap();
        assert_eq!(result.len(), 1);
        assert_approx(result[0], 14.0 / 6.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rejects_nan_input() {
        assert!(matches!(
            ema(&[1.0, f64::NAN, 3.0], 2),
            Err(AnalysisError::NonFiniteInput { index: 1 })
        ));
    }

    #[test]
    fn indicator_wrapper_names_and_lengths() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let out = Sma::new(3).compute(&bars).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, "sma_3");
        assert_eq!(out[0].1.len(), 3);
        assert_eq!(Ema::new(20).name(), "ema_20");
        assert_eq!(Wma::new(20).warmup(), 20);
    }

    #[test]
    fn no_lookahead_contamination() {
        let full: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let truncated = &full[..30];
        let a = ema(&full, 10).unwrap();
        let b = ema(truncated, 10).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x, y);
        }
    }
}
