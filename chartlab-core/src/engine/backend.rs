//! Compute backends.
//!
//! A backend decides *where* indicator and pattern work runs, never *what*
//! it computes: every backend must return bit-identical results for the same
//! window. `ParallelBackend` owns a private rayon pool (not the global one)
//! and degrades to in-thread execution if that pool cannot be built.

use rayon::prelude::*;

use super::precompute::{collect_outputs, precompute_indicators};
use crate::components::indicator::{Indicator, IndicatorValues};
use crate::config::{BackendKind, PatternConfig};
use crate::domain::Bar;
use crate::error::AnalysisError;
use crate::patterns::{self, candlestick, chart, levels, PatternReport};

pub trait ComputeBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn compute_indicators(
        &self,
        bars: &[Bar],
        indicators: &[Box<dyn Indicator>],
    ) -> Result<IndicatorValues, AnalysisError>;

    fn detect_patterns(&self, bars: &[Bar], config: &PatternConfig) -> PatternReport;
}

/// Everything on the calling thread, in suite order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialBackend;

impl ComputeBackend for SequentialBackend {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn compute_indicators(
        &self,
        bars: &[Bar],
        indicators: &[Box<dyn Indicator>],
    ) -> Result<IndicatorValues, AnalysisError> {
        precompute_indicators(bars, indicators)
    }

    fn detect_patterns(&self, bars: &[Bar], config: &PatternConfig) -> PatternReport {
        patterns::detect_all(bars, config)
    }
}

/// Indicators fan out one job per indicator; the three pattern detectors
/// run concurrently via `rayon::join`.
#[derive(Debug)]
pub struct ParallelBackend {
    pool: Option<rayon::ThreadPool>,
}

impl ParallelBackend {
    /// `threads == 0` lets rayon choose the pool size.
    pub fn new(threads: usize) -> Self {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("chartlab-worker-{i}"))
            .build()
        {
            Ok(pool) => {
                tracing::debug!(threads = pool.current_num_threads(), "parallel backend ready");
                Self { pool: Some(pool) }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to build worker pool, computing in-thread");
                Self { pool: None }
            }
        }
    }

    /// A backend whose pool is unavailable; behaves like `SequentialBackend`.
    pub fn without_pool() -> Self {
        Self { pool: None }
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }
}

impl ComputeBackend for ParallelBackend {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn compute_indicators(
        &self,
        bars: &[Bar],
        indicators: &[Box<dyn Indicator>],
    ) -> Result<IndicatorValues, AnalysisError> {
        let Some(pool) = &self.pool else {
            return precompute_indicators(bars, indicators);
        };
        let outputs = pool.install(|| {
            indicators
                .par_iter()
                .map(|indicator| indicator.compute(bars))
                .collect::<Vec<_>>()
        });
        collect_outputs(bars.len(), indicators, outputs)
    }

    fn detect_patterns(&self, bars: &[Bar], config: &PatternConfig) -> PatternReport {
        let Some(pool) = &self.pool else {
            return patterns::detect_all(bars, config);
        };
        let (candlestick, (chart, levels)) = pool.install(|| {
            rayon::join(
                || candlestick::detect(bars, &config.candlestick),
                || {
                    rayon::join(
                        || chart::detect(bars, config),
                        || levels::detect(bars, &config.levels),
                    )
                },
            )
        });
        PatternReport {
            candlestick,
            chart,
            levels,
        }
    }
}

/// Build the backend selected in configuration.
pub fn build_backend(kind: BackendKind) -> Box<dyn ComputeBackend> {
    match kind {
        BackendKind::Sequential => Box::new(SequentialBackend),
        BackendKind::Parallel { threads } => Box::new(ParallelBackend::new(threads)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndicatorConfig;
    use crate::data::synthetic::random_walk;
    use crate::indicators::suite;

    #[test]
    fn parallel_matches_sequential() {
        let bars = random_walk(150, 7);
        let indicators = suite(&IndicatorConfig::default());
        let config = PatternConfig::default();

        let seq = SequentialBackend;
        let par = ParallelBackend::new(4);
        assert!(par.is_parallel());

        assert_eq!(
            seq.compute_indicators(&bars, &indicators).unwrap(),
            par.compute_indicators(&bars, &indicators).unwrap()
        );
        assert_eq!(
            seq.detect_patterns(&bars, &config),
            par.detect_patterns(&bars, &config)
        );
    }

    #[test]
    fn poolless_backend_falls_back() {
        let bars = random_walk(80, 3);
        let indicators = suite(&IndicatorConfig::default());
        let fallback = ParallelBackend::without_pool();
        assert!(!fallback.is_parallel());
        assert_eq!(
            fallback.compute_indicators(&bars, &indicators).unwrap(),
            SequentialBackend.compute_indicators(&bars, &indicators).unwrap()
        );
    }

    #[test]
    fn build_backend_by_kind() {
        assert_eq!(build_backend(BackendKind::Sequential).name(), "sequential");
        assert_eq!(
            build_backend(BackendKind::Parallel { threads: 2 }).name(),
            "parallel"
        );
    }

    #[test]
    fn global_pool_untouched() {
        let global_threads = rayon::current_num_threads();
        let _backend = ParallelBackend::new(1);
        assert_eq!(rayon::current_num_threads(), global_threads);
    }
}
