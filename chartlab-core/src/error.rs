//! Error types shared across the analysis pipeline.
//!
//! All errors are local and recoverable: the caller can fetch more bars,
//! widen the window or fix the configuration and try again.

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::BarError;

/// Errors raised by indicators, the analysis engine and strategies.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Fewer bars (or values) than the warm-up window needs.
    #[error("insufficient data: {required} bars required, {available} available")]
    InsufficientData { required: usize, available: usize },

    #[error("invalid period for {name}: {period}")]
    InvalidPeriod { name: &'static str, period: usize },

    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Parallel input slices (high/low/close/volume) differ in length.
    #[error("length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("non-finite input value at index {index}")]
    NonFiniteInput { index: usize },

    #[error("invalid bars: {0}")]
    InvalidBars(#[from] BarError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl AnalysisError {
    /// True for the one error a caller can fix by supplying a longer window.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message() {
        let err = AnalysisError::InsufficientData {
            required: 50,
            available: 49,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: 50 bars required, 49 available"
        );
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn bar_error_converts() {
        let err: AnalysisError = BarError::NonAscending { index: 3 }.into();
        assert!(matches!(err, AnalysisError::InvalidBars(_)));
        assert!(!err.is_insufficient_data());
    }
}
