//! Strategy trait: one parameterized interface for every signal rule.
//!
//! A strategy sees only the bar window: `compute_signal(&bars)` describes
//! the last bar. Parameters live in the strategy value, so the same window
//! always produces the same signal. Strategies never hold position state;
//! `EXIT` means "the reason for being in a trade is gone", not "close the
//! position you have".

pub mod bollinger_reversion;
pub mod composite;
pub mod linear_regression;
pub mod ma_crossover;
pub mod momentum;
pub mod rsi_reversion;
pub mod volatility_breakout;
pub mod z_score;

pub use bollinger_reversion::{BollingerReversion, BollingerReversionParams};
pub use composite::{Composite, CompositeParams};
pub use linear_regression::{LinearRegression, LinearRegressionParams};
pub use ma_crossover::{MaCrossover, MaCrossoverParams};
pub use momentum::{MomentumStrategy, MomentumParams};
pub use rsi_reversion::{RsiReversion, RsiReversionParams};
pub use volatility_breakout::{VolatilityBreakout, VolatilityBreakoutParams};
pub use z_score::{ZScore, ZScoreParams};

use crate::domain::{validate_bars, Bar, Signal};
use crate::error::AnalysisError;

pub trait Strategy: Send + Sync {
    /// Stable identifier, e.g. "z_score".
    fn name(&self) -> &str;

    /// Bars needed before `compute_signal` can succeed.
    fn warmup_bars(&self) -> usize;

    /// Signal for the last bar of `bars`.
    fn compute_signal(&self, bars: &[Bar]) -> Result<Signal, AnalysisError>;
}

/// Evaluate `strategy` on every expanding window from its warmup to the full
/// series and keep the actionable signals.
pub fn run_strategy(strategy: &dyn Strategy, bars: &[Bar]) -> Result<Vec<Signal>, AnalysisError> {
    let warmup = strategy.warmup_bars().max(1);
    if bars.len() < warmup {
        return Err(AnalysisError::InsufficientData {
            required: warmup,
            available: bars.len(),
        });
    }
    validate_bars(bars)?;

    let mut signals = Vec::new();
    for end in warmup..=bars.len() {
        let signal = strategy.compute_signal(&bars[..end])?;
        if signal.signal_type.is_actionable() {
            signals.push(signal);
        }
    }
    tracing::debug!(
        strategy = strategy.name(),
        windows = bars.len() - warmup + 1,
        signals = signals.len(),
        "strategy run complete"
    );
    Ok(signals)
}

/// Guard shared by every strategy.
pub(crate) fn require_bars(bars: &[Bar], required: usize) -> Result<&Bar, AnalysisError> {
    match bars.last() {
        Some(last) if bars.len() >= required => Ok(last),
        _ => Err(AnalysisError::InsufficientData {
            required,
            available: bars.len(),
        }),
    }
}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<(), AnalysisError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidParameter { name, value })
    }
}

/// The last two values of a series: (previous, current).
pub(crate) fn last_two(series: &[f64]) -> Option<(f64, f64)> {
    match series {
        [.., prev, curr] => Some((*prev, *curr)),
        _ => None,
    }
}
