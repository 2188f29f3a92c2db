//! Signal: the externally visible output for one bar.
//!
//! Produced by the analysis engine (via `AnalysisResult::to_signal`) and by
//! every strategy. Consumers downstream (execution, journaling) only ever see
//! this type, never the raw scores behind it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Bar;

/// What the producer wants done at this bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    Buy,
    Sell,
    Exit,
    Hold,
}

impl SignalType {
    /// True for anything other than `Hold`.
    pub fn is_actionable(self) -> bool {
        !matches!(self, Self::Hold)
    }
}

/// A typed signal for one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub timestamp: DateTime<Utc>,
    pub signal_type: SignalType,
    /// Conviction, 0.0 to 1.0.
    pub strength: f64,
    /// Reference price (the bar close).
    pub price: f64,
    /// Human-readable reasons, in the order the rules fired.
    pub reasons: Vec<String>,
}

impl Signal {
    /// Build a signal for `bar`. Strength is clamped into [0, 1]; a non-finite
    /// strength collapses to 0.
    pub fn new(bar: &Bar, signal_type: SignalType, strength: f64, reasons: Vec<String>) -> Self {
        let strength = if strength.is_finite() {
            strength.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            timestamp: bar.timestamp,
            signal_type,
            strength,
            price: bar.close,
            reasons,
        }
    }

    pub fn hold(bar: &Bar, reason: impl Into<String>) -> Self {
        Self::new(bar, SignalType::Hold, 0.0, vec![reason.into()])
    }
}
