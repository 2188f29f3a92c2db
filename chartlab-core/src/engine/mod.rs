//! Analysis engine: indicator and pattern fan-out reduced to one scored
//! signal and a trend classification.
//!
//! One analysis runs four stages over an immutable bar window:
//!
//! 1. Guard: enough bars for the floor and the suite warmup, valid window
//! 2. Indicators: the configured suite, on the selected backend
//! 3. Patterns: candlesticks, chart patterns and price levels
//! 4. Reduce: additive scoring plus EMA trend classification
//!
//! The same window and configuration always produce the same result.

pub mod backend;
pub mod precompute;
pub mod scoring;
pub mod trend;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use backend::{build_backend, ComputeBackend, ParallelBackend, SequentialBackend};
pub use precompute::{compute_warmup, precompute_indicators, required_bars};
pub use scoring::{score, SignalScore};
pub use trend::{classify, Trend, TrendDirection};

use crate::components::indicator::{Indicator, IndicatorValues};
use crate::config::AnalysisConfig;
use crate::domain::{validate_bars, Bar, Signal, SignalType};
use crate::error::AnalysisError;
use crate::indicators::suite;
use crate::patterns::PatternReport;

/// Everything one analysis produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub bar_count: usize,
    pub indicators: IndicatorValues,
    pub patterns: PatternReport,
    pub signals: SignalScore,
    pub trend: Trend,
}

impl AnalysisResult {
    /// The externally visible signal for the last bar of the analysed window.
    pub fn to_signal(&self, bars: &[Bar]) -> Result<Signal, AnalysisError> {
        let bar = bars.last().ok_or(AnalysisError::InsufficientData {
            required: 1,
            available: 0,
        })?;
        let signal_type = if self.signals.buy {
            SignalType::Buy
        } else if self.signals.sell {
            SignalType::Sell
        } else {
            SignalType::Hold
        };
        let mut reasons = self.signals.reasons.clone();
        if reasons.is_empty() {
            reasons.push("no scoring rule fired".to_string());
        }
        Ok(Signal::new(bar, signal_type, self.signals.strength, reasons))
    }
}

pub struct AnalysisEngine {
    config: AnalysisConfig,
    indicators: Vec<Box<dyn Indicator>>,
    backend: Box<dyn ComputeBackend>,
    required_bars: usize,
}

impl fmt::Debug for AnalysisEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisEngine")
            .field("backend", &self.backend.name())
            .field("indicators", &self.indicators.len())
            .field("required_bars", &self.required_bars)
            .finish()
    }
}

impl AnalysisEngine {
    /// Validate `config` and build the backend it selects.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        let backend = build_backend(config.backend);
        Self::with_backend(config, backend)
    }

    /// Use an explicit backend instead of the configured one.
    pub fn with_backend(
        config: AnalysisConfig,
        backend: Box<dyn ComputeBackend>,
    ) -> Result<Self, AnalysisError> {
        config.validate()?;
        let indicators = suite(&config.indicators);
        let required_bars = required_bars(&config, &indicators);
        tracing::debug!(
            backend = backend.name(),
            indicators = indicators.len(),
            required_bars,
            "analysis engine configured"
        );
        Ok(Self {
            config,
            indicators,
            backend,
            required_bars,
        })
    }

    pub fn with_defaults() -> Self {
        let config = AnalysisConfig::default();
        let indicators = suite(&config.indicators);
        let required_bars = required_bars(&config, &indicators);
        Self {
            config,
            indicators,
            backend: Box::new(SequentialBackend),
            required_bars,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Smallest window `analyze` accepts.
    pub fn required_bars(&self) -> usize {
        self.required_bars
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn analyze(&self, bars: &[Bar]) -> Result<AnalysisResult, AnalysisError> {
        if bars.len() < self.required_bars {
            return Err(AnalysisError::InsufficientData {
                required: self.required_bars,
                available: bars.len(),
            });
        }
        validate_bars(bars)?;

        let indicators = self.backend.compute_indicators(bars, &self.indicators)?;
        tracing::debug!(series = indicators.len(), "indicators computed");

        let patterns = self.backend.detect_patterns(bars, &self.config.patterns);
        tracing::debug!(
            candlestick = patterns.candlestick.len(),
            chart = patterns.chart.len(),
            levels = patterns.levels.len(),
            "patterns detected"
        );

        let signals = score(bars, &indicators, &patterns, &self.config);
        let trend = match (
            indicators.get_series(&self.config.indicators.ema_fast_key()),
            indicators.get_series(&self.config.indicators.ema_slow_key()),
        ) {
            (Some(fast), Some(slow)) => classify(fast, slow, &self.config.trend),
            _ => Trend::sideways(),
        };
        tracing::debug!(
            buy_score = signals.buy_score,
            sell_score = signals.sell_score,
            trend = ?trend.direction,
            "analysis scored"
        );

        Ok(AnalysisResult {
            bar_count: bars.len(),
            indicators,
            patterns,
            signals,
            trend,
        })
    }
}
