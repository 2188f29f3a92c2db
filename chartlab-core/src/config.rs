//! Analysis configuration.
//!
//! Every tunable lives in a named field with a documented default; there
//! are no loose parameter maps. All structs are `#[serde(default)]`, so a
//! TOML file only needs the keys it changes:
//!
//! ```toml
//! min_bars = 60
//!
//! [backend]
//! type = "PARALLEL"
//! threads = 4
//!
//! [indicators.rsi]
//! period = 21
//!
//! [scoring]
//! min_score = 4.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn ensure(condition: bool, field: &str, reason: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(invalid(field, reason))
    }
}

fn ensure_period(field: &str, period: usize) -> Result<(), ConfigError> {
    ensure(period >= 1, field, "period must be >= 1")
}

fn ensure_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    ensure(
        value.is_finite() && value > 0.0,
        field,
        "must be a finite number > 0",
    )
}

fn ensure_non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    ensure(
        value.is_finite() && value >= 0.0,
        field,
        "must be a finite number >= 0",
    )
}

fn ensure_fraction(field: &str, value: f64) -> Result<(), ConfigError> {
    ensure(
        value.is_finite() && value > 0.0 && value < 1.0,
        field,
        "must be in (0, 1)",
    )
}

// ─── Top level ───────────────────────────────────────────────────────

/// Complete configuration of one analysis engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Hard minimum window length. The engine also never accepts fewer bars
    /// than the indicator suite's warm-up.
    pub min_bars: usize,
    pub backend: BackendKind,
    pub indicators: IndicatorConfig,
    pub patterns: PatternConfig,
    pub scoring: ScoringConfig,
    pub trend: TrendConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_bars: 50,
            backend: BackendKind::default(),
            indicators: IndicatorConfig::default(),
            patterns: PatternConfig::default(),
            scoring: ScoringConfig::default(),
            trend: TrendConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from TOML and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field; the first violation is reported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.min_bars >= 1, "min_bars", "must be >= 1")?;
        self.indicators.validate()?;
        self.patterns.validate()?;
        self.scoring.validate()?;
        self.trend.validate()
    }
}

/// Where indicator and pattern work runs. Both produce identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackendKind {
    #[default]
    Sequential,
    /// Private rayon pool. `threads = 0` lets rayon pick.
    Parallel { threads: usize },
}

// ─── Indicators ──────────────────────────────────────────────────────

macro_rules! period_config {
    ($(#[$doc:meta])* $name:ident, $default:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            pub period: usize,
        }

        impl Default for $name {
            fn default() -> Self {
                Self { period: $default }
            }
        }
    };
}

period_config!(SmaConfig, 20);
period_config!(WmaConfig, 20);
period_config!(
    /// Wilder RSI period.
    RsiConfig,
    14
);
period_config!(WilliamsRConfig, 14);
period_config!(AtrConfig, 14);
period_config!(CciConfig, 20);
period_config!(MomentumConfig, 10);
period_config!(RocConfig, 10);

/// The EMA pair used by the trend rule and the trend classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendEmaConfig {
    pub fast: usize,
    pub slow: usize,
}

impl Default for TrendEmaConfig {
    fn default() -> Self {
        Self { fast: 20, slow: 50 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochasticConfig {
    pub k_period: usize,
    pub d_period: usize,
}

impl Default for StochasticConfig {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdConfig {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerConfig {
    pub period: usize,
    pub std_dev: f64,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev: 2.0,
        }
    }
}

/// Periods of every indicator in the analysis suite.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub sma: SmaConfig,
    pub trend_ema: TrendEmaConfig,
    pub wma: WmaConfig,
    pub rsi: RsiConfig,
    pub stochastic: StochasticConfig,
    pub williams_r: WilliamsRConfig,
    pub macd: MacdConfig,
    pub bollinger: BollingerConfig,
    pub atr: AtrConfig,
    pub cci: CciConfig,
    pub momentum: MomentumConfig,
    pub roc: RocConfig,
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_period("indicators.sma.period", self.sma.period)?;
        ensure_period("indicators.trend_ema.fast", self.trend_ema.fast)?;
        ensure_period("indicators.trend_ema.slow", self.trend_ema.slow)?;
        ensure(
            self.trend_ema.fast < self.trend_ema.slow,
            "indicators.trend_ema",
            "fast period must be shorter than slow period",
        )?;
        ensure_period("indicators.wma.period", self.wma.period)?;
        ensure_period("indicators.rsi.period", self.rsi.period)?;
        ensure_period("indicators.stochastic.k_period", self.stochastic.k_period)?;
        ensure_period("indicators.stochastic.d_period", self.stochastic.d_period)?;
        ensure_period("indicators.williams_r.period", self.williams_r.period)?;
        ensure_period("indicators.macd.fast", self.macd.fast)?;
        ensure_period("indicators.macd.slow", self.macd.slow)?;
        ensure_period("indicators.macd.signal", self.macd.signal)?;
        ensure(
            self.macd.fast < self.macd.slow,
            "indicators.macd",
            "fast period must be shorter than slow period",
        )?;
        ensure_period("indicators.bollinger.period", self.bollinger.period)?;
        ensure_non_negative("indicators.bollinger.std_dev", self.bollinger.std_dev)?;
        ensure_period("indicators.atr.period", self.atr.period)?;
        ensure_period("indicators.cci.period", self.cci.period)?;
        ensure_period("indicators.momentum.period", self.momentum.period)?;
        ensure_period("indicators.roc.period", self.roc.period)
    }

    /// Series name of the configured RSI.
    pub fn rsi_key(&self) -> String {
        format!("rsi_{}", self.rsi.period)
    }

    pub fn ema_fast_key(&self) -> String {
        format!("ema_{}", self.trend_ema.fast)
    }

    pub fn ema_slow_key(&self) -> String {
        format!("ema_{}", self.trend_ema.slow)
    }
}

// ─── Patterns ────────────────────────────────────────────────────────

/// Body/shadow ratio thresholds for single-bar and two-bar patterns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandlestickConfig {
    /// Doji when `body / range` is below this.
    pub doji_body_ratio: f64,
    /// Hammer / shooting star: long shadow must exceed `body * shadow_ratio`.
    pub shadow_ratio: f64,
    /// Hammer / shooting star: short shadow must stay under `body * opposite_shadow_ratio`.
    pub opposite_shadow_ratio: f64,
    /// Number of most recent bars scanned.
    pub lookback: usize,
}

impl Default for CandlestickConfig {
    fn default() -> Self {
        Self {
            doji_body_ratio: 0.1,
            shadow_ratio: 2.0,
            opposite_shadow_ratio: 0.3,
            lookback: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtremaConfig {
    /// A peak must be the maximum of `±min_distance` bars.
    pub min_distance: usize,
    /// Half-width of the window used for prominence.
    pub prominence_window: usize,
    /// Minimum relative prominence (0.02 = 2%).
    pub min_prominence: f64,
}

impl Default for ExtremaConfig {
    fn default() -> Self {
        Self {
            min_distance: 5,
            prominence_window: 20,
            min_prominence: 0.02,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartPatternConfig {
    /// Relative price tolerance between the two tops (bottoms).
    pub double_tolerance: f64,
    /// Relative price tolerance between the two shoulders.
    pub shoulder_tolerance: f64,
    /// Minimum bars between consecutive extrema of one pattern.
    pub min_separation: usize,
    /// Head prominence over the shoulders that earns full confidence.
    pub head_prominence_scale: f64,
}

impl Default for ChartPatternConfig {
    fn default() -> Self {
        Self {
            double_tolerance: 0.03,
            shoulder_tolerance: 0.05,
            min_separation: 10,
            head_prominence_scale: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangleConfig {
    /// Per-bar slope, relative to the mean price, treated as flat.
    pub flat_slope: f64,
    /// The two lines must meet between `min_horizon` and `max_horizon`
    /// bars after the last bar.
    pub min_horizon: usize,
    pub max_horizon: usize,
    /// Only extrema within the last `window` bars are fitted.
    pub window: usize,
    /// At most this many of the latest peaks (and troughs) are fitted.
    pub max_points: usize,
}

impl Default for TriangleConfig {
    fn default() -> Self {
        Self {
            flat_slope: 0.001,
            min_horizon: 5,
            max_horizon: 50,
            window: 60,
            max_points: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Cluster tolerance relative to the cluster mean (0.015 = 1.5%).
    pub tolerance: f64,
    /// Cluster members needed to form a level.
    pub min_touches: usize,
    /// Every `close_stride`-th close joins the highs and lows.
    pub close_stride: usize,
    /// Strength bonus for a level that acted as both support and resistance.
    pub dual_role_multiplier: f64,
    pub max_strength: f64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.015,
            min_touches: 3,
            close_stride: 5,
            dual_role_multiplier: 1.5,
            max_strength: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub candlestick: CandlestickConfig,
    pub extrema: ExtremaConfig,
    pub chart: ChartPatternConfig,
    pub triangle: TriangleConfig,
    pub levels: LevelConfig,
}

impl PatternConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.candlestick;
        ensure_positive("patterns.candlestick.doji_body_ratio", c.doji_body_ratio)?;
        ensure_positive("patterns.candlestick.shadow_ratio", c.shadow_ratio)?;
        ensure_positive(
            "patterns.candlestick.opposite_shadow_ratio",
            c.opposite_shadow_ratio,
        )?;
        ensure(
            c.lookback >= 1,
            "patterns.candlestick.lookback",
            "must be >= 1",
        )?;

        let e = &self.extrema;
        ensure(
            e.min_distance >= 1,
            "patterns.extrema.min_distance",
            "must be >= 1",
        )?;
        ensure(
            e.prominence_window >= 1,
            "patterns.extrema.prominence_window",
            "must be >= 1",
        )?;
        ensure_non_negative("patterns.extrema.min_prominence", e.min_prominence)?;

        let ch = &self.chart;
        ensure_fraction("patterns.chart.double_tolerance", ch.double_tolerance)?;
        ensure_fraction("patterns.chart.shoulder_tolerance", ch.shoulder_tolerance)?;
        ensure(
            ch.min_separation >= 1,
            "patterns.chart.min_separation",
            "must be >= 1",
        )?;
        ensure_positive(
            "patterns.chart.head_prominence_scale",
            ch.head_prominence_scale,
        )?;

        let t = &self.triangle;
        ensure_non_negative("patterns.triangle.flat_slope", t.flat_slope)?;
        ensure(
            t.min_horizon <= t.max_horizon,
            "patterns.triangle.min_horizon",
            "must not exceed max_horizon",
        )?;
        ensure(t.window >= 2, "patterns.triangle.window", "must be >= 2")?;
        ensure(
            t.max_points >= 2,
            "patterns.triangle.max_points",
            "a trend line needs at least 2 points",
        )?;

        let l = &self.levels;
        ensure_fraction("patterns.levels.tolerance", l.tolerance)?;
        ensure(
            l.min_touches >= 1,
            "patterns.levels.min_touches",
            "must be >= 1",
        )?;
        ensure(
            l.close_stride >= 1,
            "patterns.levels.close_stride",
            "must be >= 1",
        )?;
        ensure(
            l.dual_role_multiplier.is_finite() && l.dual_role_multiplier >= 1.0,
            "patterns.levels.dual_role_multiplier",
            "must be >= 1",
        )?;
        ensure_positive("patterns.levels.max_strength", l.max_strength)
    }
}

// ─── Scoring ─────────────────────────────────────────────────────────

/// Points each rule adds to its side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub rsi: f64,
    pub macd: f64,
    pub ema_trend: f64,
    pub stochastic: f64,
    /// Per matching candlestick pattern.
    pub candlestick: f64,
    /// Per matching chart pattern.
    pub chart_pattern: f64,
    pub volume: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            rsi: 2.0,
            macd: 2.0,
            ema_trend: 1.0,
            stochastic: 1.0,
            candlestick: 1.0,
            chart_pattern: 2.0,
            volume: 1.0,
        }
    }
}

/// The additive point system that turns indicators and patterns into a
/// buy/sell decision. The defaults are a fixed policy, not a fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub stoch_oversold: f64,
    pub stoch_overbought: f64,
    /// Current volume above `previous * volume_surge` counts as a surge.
    pub volume_surge: f64,
    pub weights: ScoringWeights,
    /// A side needs at least this score (and to lead) to fire.
    pub min_score: f64,
    /// `strength = min(max_score / strength_divisor, 1)`.
    pub strength_divisor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            stoch_oversold: 20.0,
            stoch_overbought: 80.0,
            volume_surge: 1.5,
            weights: ScoringWeights::default(),
            min_score: 3.0,
            strength_divisor: 5.0,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            self.rsi_oversold < self.rsi_overbought,
            "scoring.rsi_oversold",
            "must be below rsi_overbought",
        )?;
        ensure(
            self.stoch_oversold < self.stoch_overbought,
            "scoring.stoch_oversold",
            "must be below stoch_overbought",
        )?;
        ensure_positive("scoring.volume_surge", self.volume_surge)?;
        let w = &self.weights;
        for (field, value) in [
            ("scoring.weights.rsi", w.rsi),
            ("scoring.weights.macd", w.macd),
            ("scoring.weights.ema_trend", w.ema_trend),
            ("scoring.weights.stochastic", w.stochastic),
            ("scoring.weights.candlestick", w.candlestick),
            ("scoring.weights.chart_pattern", w.chart_pattern),
            ("scoring.weights.volume", w.volume),
        ] {
            ensure_non_negative(field, value)?;
        }
        ensure_non_negative("scoring.min_score", self.min_score)?;
        ensure_positive("scoring.strength_divisor", self.strength_divisor)
    }
}

// ─── Trend ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Number of most recent EMA values inspected.
    pub lookback: usize,
    /// Percent change (as a fraction) is multiplied by this before capping at 1.
    pub pct_scale: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            lookback: 10,
            pct_scale: 10.0,
        }
    }
}

impl TrendConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.lookback >= 2, "trend.lookback", "must be >= 2")?;
        ensure_positive("trend.pct_scale", self.pct_scale)
    }
}
