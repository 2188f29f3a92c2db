//! ChartLab Core: indicators, pattern recognition, signal scoring, strategies.
//!
//! This crate contains the whole technical-analysis pipeline:
//! - Domain types (bars, signals)
//! - Indicator library: pure slice-to-series calculators with neutral defaults
//! - Pattern recognition: candlesticks, extremum-based chart patterns, price levels
//! - Analysis engine: indicator + pattern fan-out reduced to one scored signal
//! - Compute backends: sequential and rayon-parallel, bit-identical results
//! - Strategy family behind one `Strategy` trait, selected by tagged config

pub mod components;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod indicators;
pub mod patterns;

pub use config::AnalysisConfig;
pub use domain::{Bar, Signal, SignalType};
pub use engine::{AnalysisEngine, AnalysisResult};
pub use error::AnalysisError;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a backend hands across threads is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Signal>();
        require_sync::<domain::Signal>();

        require_send::<components::IndicatorValues>();
        require_sync::<components::IndicatorValues>();
        require_send::<patterns::PatternMatch>();
        require_sync::<patterns::PatternMatch>();
        require_send::<patterns::PriceLevel>();
        require_sync::<patterns::PriceLevel>();

        require_send::<config::AnalysisConfig>();
        require_sync::<config::AnalysisConfig>();
        require_send::<engine::AnalysisEngine>();
        require_sync::<engine::AnalysisEngine>();
        require_send::<engine::AnalysisResult>();
        require_sync::<engine::AnalysisResult>();

        require_send::<engine::SequentialBackend>();
        require_sync::<engine::SequentialBackend>();
        require_send::<engine::ParallelBackend>();
        require_sync::<engine::ParallelBackend>();
    }

    /// Architecture contract: strategies see only the bar window.
    ///
    /// `compute_signal` takes `&[Bar]` and nothing else. Parameters live in the
    /// strategy value, so the same window always produces the same signal.
    #[test]
    fn strategy_trait_takes_only_the_window() {
        fn _check_trait_object_builds(
            strategy: &dyn components::Strategy,
            bars: &[domain::Bar],
        ) -> Result<domain::Signal, AnalysisError> {
            strategy.compute_signal(bars)
        }
    }
}
