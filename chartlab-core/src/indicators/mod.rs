//! Indicator library.
//!
//! Every calculator is a pure function from one or more input slices to a
//! derived series aligned to a suffix of the input. Warm-up bars are
//! truncated, not NaN-padded: `sma(values, p)` has `values.len() - p + 1`
//! entries. Zero denominators collapse to documented neutral defaults
//! (50 for oscillators, 0 for trend measures) so no NaN or infinity ever
//! leaves this module.
//!
//! Each calculator also has an `Indicator` wrapper (e.g. `Rsi`) so the
//! engine can run the configured suite as a list of independent jobs.

pub mod atr;
pub mod bollinger;
pub mod cci;
pub mod levels;
pub mod macd;
pub mod momentum;
pub mod moving_average;
pub mod rsi;
pub mod statistics;
pub mod stochastic;
pub mod volume;

pub use atr::{atr, true_range, Atr};
pub use bollinger::{bollinger_bands, Bollinger, BollingerOutput};
pub use cci::{cci, Cci};
pub use levels::{fibonacci_retracement, pivot_points, FibonacciLevels, PivotPoints};
pub use macd::{macd, Macd, MacdOutput};
pub use momentum::{momentum, roc, Momentum, Roc};
pub use moving_average::{ema, sma, wma, Ema, Sma, Wma};
pub use rsi::{rsi, Rsi};
pub use statistics::{mean, population_std_dev, z_score};
pub use stochastic::{stochastic, williams_r, Stochastic, StochasticOutput, WilliamsR};
pub use volume::{obv, vwap, Obv, Vwap};

use crate::components::indicator::Indicator;
use crate::config::IndicatorConfig;
use crate::error::AnalysisError;

/// Build the indicator suite described by `config`, in a fixed order.
///
/// The order is part of the contract: backends may compute the jobs in any
/// order but must insert results in this one.
pub fn suite(config: &IndicatorConfig) -> Vec<Box<dyn Indicator>> {
    vec![
        Box::new(Sma::new(config.sma.period)),
        Box::new(Ema::new(config.trend_ema.fast)),
        Box::new(Ema::new(config.trend_ema.slow)),
        Box::new(Wma::new(config.wma.period)),
        Box::new(Rsi::new(config.rsi.period)),
        Box::new(Stochastic::new(
            config.stochastic.k_period,
            config.stochastic.d_period,
        )),
        Box::new(WilliamsR::new(config.williams_r.period)),
        Box::new(Macd::new(
            config.macd.fast,
            config.macd.slow,
            config.macd.signal,
        )),
        Box::new(Bollinger::new(
            config.bollinger.period,
            config.bollinger.std_dev,
        )),
        Box::new(Atr::new(config.atr.period)),
        Box::new(Cci::new(config.cci.period)),
        Box::new(Momentum::new(config.momentum.period)),
        Box::new(Roc::new(config.roc.period)),
        Box::new(Vwap),
        Box::new(Obv),
    ]
}

// ── Shared guards ────────────────────────────────────────────────────

pub(crate) fn check_period(name: &'static str, period: usize) -> Result<(), AnalysisError> {
    if period == 0 {
        return Err(AnalysisError::InvalidPeriod { name, period });
    }
    Ok(())
}

pub(crate) fn require_len(available: usize, required: usize) -> Result<(), AnalysisError> {
    if available < required {
        return Err(AnalysisError::InsufficientData {
            required,
            available,
        });
    }
    Ok(())
}

pub(crate) fn check_finite(values: &[f64]) -> Result<(), AnalysisError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(AnalysisError::NonFiniteInput { index }),
        None => Ok(()),
    }
}

/// Guard parallel OHLC(V) slices: same length, all finite.
pub(crate) fn check_parallel(series: &[&[f64]]) -> Result<usize, AnalysisError> {
    let expected = series.first().map(|s| s.len()).unwrap_or(0);
    for s in series {
        if s.len() != expected {
            return Err(AnalysisError::LengthMismatch {
                expected,
                actual: s.len(),
            });
        }
        check_finite(s)?;
    }
    Ok(expected)
}

/// Replace a non-finite result with the indicator's neutral default.
#[inline]
pub(crate) fn or_neutral(value: f64, neutral: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        neutral
    }
}

/// True when a dispersion measure is rounding noise relative to the level
/// it was measured around. A constant window like `[0.1; 20]` has a mean one
/// ulp away from its members, so an exact `== 0.0` test misses it.
#[inline]
pub(crate) fn negligible(dispersion: f64, level: f64) -> bool {
    dispersion <= level.abs() * 1e-12
}

/// Highest and lowest value of a non-empty window.
pub(crate) fn window_extremes(highs: &[f64], lows: &[f64]) -> (f64, f64) {
    let highest = highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest = lows.iter().copied().fold(f64::INFINITY, f64::min);
    (highest, lowest)
}

// ── Test helpers ─────────────────────────────────────────────────────

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar::new(
                base + chrono::Duration::days(i as i64),
                open,
                open.max(close) + 1.0,
                open.min(close) - 1.0,
                close,
                1000.0,
            )
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
