//! Pattern recognition.
//!
//! Detectors classify local bar geometry into named patterns with a
//! confidence in `[0, 1]` and find significant price levels. Every detector
//! is a pure function of the bar window: no state carries over between
//! scans, and "nothing found" is an empty vector, never an error.

pub mod candlestick;
pub mod chart;
pub mod extrema;
pub mod levels;
pub mod regression;

use serde::{Deserialize, Serialize};

use crate::config::PatternConfig;
use crate::domain::Bar;

pub use extrema::{find_peaks, find_troughs, Extremum};
pub use regression::{linear_fit, LinearFit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternKind {
    Doji,
    Hammer,
    ShootingStar,
    BullishEngulfing,
    BearishEngulfing,
    DoubleTop,
    DoubleBottom,
    HeadAndShoulders,
    InverseHeadAndShoulders,
    AscendingTriangle,
    DescendingTriangle,
    SymmetricalTriangle,
}

/// Directional lean of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

impl PatternKind {
    pub fn bias(self) -> Bias {
        match self {
            Self::Hammer
            | Self::BullishEngulfing
            | Self::DoubleBottom
            | Self::InverseHeadAndShoulders
            | Self::AscendingTriangle => Bias::Bullish,
            Self::ShootingStar
            | Self::BearishEngulfing
            | Self::DoubleTop
            | Self::HeadAndShoulders
            | Self::DescendingTriangle => Bias::Bearish,
            Self::Doji | Self::SymmetricalTriangle => Bias::Neutral,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Doji => "doji",
            Self::Hammer => "hammer",
            Self::ShootingStar => "shooting star",
            Self::BullishEngulfing => "bullish engulfing",
            Self::BearishEngulfing => "bearish engulfing",
            Self::DoubleTop => "double top",
            Self::DoubleBottom => "double bottom",
            Self::HeadAndShoulders => "head and shoulders",
            Self::InverseHeadAndShoulders => "inverse head and shoulders",
            Self::AscendingTriangle => "ascending triangle",
            Self::DescendingTriangle => "descending triangle",
            Self::SymmetricalTriangle => "symmetrical triangle",
        }
    }
}

/// Trade idea tag attached to a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternSignal {
    BuyBreakout,
    BuyNecklineBreak,
    SellBreakdown,
    SellNecklineBreak,
    WatchBreakout,
    BullishReversal,
    BearishReversal,
    Indecision,
}

impl PatternSignal {
    pub fn is_buy(self) -> bool {
        matches!(self, Self::BuyBreakout | Self::BuyNecklineBreak)
    }

    pub fn is_sell(self) -> bool {
        matches!(self, Self::SellBreakdown | Self::SellNecklineBreak)
    }
}

/// One detected pattern. Indices refer to the scanned bar window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub kind: PatternKind,
    pub confidence: f64,
    pub start_index: usize,
    pub end_index: usize,
    pub description: String,
    pub signals: Vec<PatternSignal>,
    pub target_price: Option<f64>,
    pub stop_loss: Option<f64>,
}

impl PatternMatch {
    pub(crate) fn new(
        kind: PatternKind,
        confidence: f64,
        start_index: usize,
        end_index: usize,
        description: String,
    ) -> Self {
        Self {
            kind,
            confidence: if confidence.is_finite() {
                confidence.clamp(0.0, 1.0)
            } else {
                0.0
            },
            start_index,
            end_index,
            description,
            signals: Vec::new(),
            target_price: None,
            stop_loss: None,
        }
    }

    pub(crate) fn with_signal(mut self, signal: PatternSignal) -> Self {
        self.signals.push(signal);
        self
    }

    pub(crate) fn with_targets(mut self, target: Option<f64>, stop: Option<f64>) -> Self {
        self.target_price = target.filter(|v| v.is_finite());
        self.stop_loss = stop.filter(|v| v.is_finite());
        self
    }

    pub fn has_buy_signal(&self) -> bool {
        self.signals.iter().any(|s| s.is_buy())
    }

    pub fn has_sell_signal(&self) -> bool {
        self.signals.iter().any(|s| s.is_sell())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevelKind {
    Support,
    Resistance,
    /// Acted as both support and resistance.
    Pivot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    pub kind: LevelKind,
    /// Cluster size: how many highs, lows and sampled closes fell in the zone.
    pub touches: usize,
    pub support_touches: usize,
    pub resistance_touches: usize,
    /// In `[0, max_strength]`.
    pub strength: f64,
}

/// Everything the pattern stage found in one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternReport {
    pub candlestick: Vec<PatternMatch>,
    pub chart: Vec<PatternMatch>,
    pub levels: Vec<PriceLevel>,
}

impl PatternReport {
    pub fn total(&self) -> usize {
        self.candlestick.len() + self.chart.len() + self.levels.len()
    }
}

/// Run every detector over `bars`, one after another.
pub fn detect_all(bars: &[Bar], config: &PatternConfig) -> PatternReport {
    PatternReport {
        candlestick: candlestick::detect(bars, &config.candlestick),
        chart: chart::detect(bars, config),
        levels: levels::detect(bars, &config.levels),
    }
}
