//! Additive point scoring.
//!
//! Seven independent rules each add their configured weight to the buy or
//! the sell side. Only the most recent indicator values are consulted.
//! A side fires when it leads and reaches `min_score`.

use serde::{Deserialize, Serialize};

use crate::components::indicator::IndicatorValues;
use crate::config::{AnalysisConfig, ScoringConfig};
use crate::domain::Bar;
use crate::patterns::{Bias, PatternReport};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalScore {
    pub buy: bool,
    pub sell: bool,
    /// `min(max(buy_score, sell_score) / strength_divisor, 1)`.
    pub strength: f64,
    pub buy_score: f64,
    pub sell_score: f64,
    /// One entry per rule that fired, in rule order.
    pub reasons: Vec<String>,
}

#[derive(Default)]
struct Tally {
    buy: f64,
    sell: f64,
    reasons: Vec<String>,
}

impl Tally {
    fn buy(&mut self, points: f64, reason: String) {
        self.buy += points;
        self.reasons.push(reason);
    }

    fn sell(&mut self, points: f64, reason: String) {
        self.sell += points;
        self.reasons.push(reason);
    }
}

pub fn score(
    bars: &[Bar],
    indicators: &IndicatorValues,
    patterns: &PatternReport,
    config: &AnalysisConfig,
) -> SignalScore {
    let s = &config.scoring;
    let w = &s.weights;
    let mut t = Tally::default();

    // 1. RSI extremes
    if let Some(rsi) = indicators.last(&config.indicators.rsi_key()) {
        if rsi < s.rsi_oversold {
            t.buy(w.rsi, format!("RSI oversold ({rsi:.1})"));
        } else if rsi > s.rsi_overbought {
            t.sell(w.rsi, format!("RSI overbought ({rsi:.1})"));
        }
    }

    // 2. MACD against its signal line, on the matching side of zero
    if let (Some(macd), Some(signal)) = (indicators.last("macd"), indicators.last("macd_signal")) {
        if macd > signal && macd > 0.0 {
            t.buy(w.macd, "MACD above signal line".to_string());
        } else if macd < signal && macd < 0.0 {
            t.sell(w.macd, "MACD below signal line".to_string());
        }
    }

    // 3. EMA stack with price on the right side
    let fast = indicators.last(&config.indicators.ema_fast_key());
    let slow = indicators.last(&config.indicators.ema_slow_key());
    if let (Some(fast), Some(slow), Some(bar)) = (fast, slow, bars.last()) {
        if fast > slow && bar.close > fast {
            t.buy(w.ema_trend, "price above rising EMA stack".to_string());
        } else if fast < slow && bar.close < fast {
            t.sell(w.ema_trend, "price below falling EMA stack".to_string());
        }
    }

    // 4. Stochastic extremes
    if let Some(k) = indicators.last("stoch_k") {
        if k < s.stoch_oversold {
            t.buy(w.stochastic, format!("stochastic oversold ({k:.1})"));
        } else if k > s.stoch_overbought {
            t.sell(w.stochastic, format!("stochastic overbought ({k:.1})"));
        }
    }

    // 5. Candlesticks, one vote each
    for m in &patterns.candlestick {
        match m.kind.bias() {
            Bias::Bullish => t.buy(w.candlestick, m.description.clone()),
            Bias::Bearish => t.sell(w.candlestick, m.description.clone()),
            Bias::Neutral => {}
        }
    }

    // 6. Chart patterns carrying a trade tag
    for m in &patterns.chart {
        if m.has_buy_signal() {
            t.buy(w.chart_pattern, m.description.clone());
        }
        if m.has_sell_signal() {
            t.sell(w.chart_pattern, m.description.clone());
        }
    }

    // 7. Volume surge in the direction of the close
    if let [.., prev, curr] = bars {
        if curr.volume > prev.volume * s.volume_surge {
            if curr.close > prev.close {
                t.buy(w.volume, "volume surge on up close".to_string());
            } else if curr.close < prev.close {
                t.sell(w.volume, "volume surge on down close".to_string());
            }
        }
    }

    decide(t, s)
}

fn decide(t: Tally, s: &ScoringConfig) -> SignalScore {
    let buy = t.buy > t.sell && t.buy >= s.min_score;
    let sell = t.sell > t.buy && t.sell >= s.min_score;
    let strength = (t.buy.max(t.sell) / s.strength_divisor).min(1.0);
    SignalScore {
        buy,
        sell,
        strength,
        buy_score: t.buy,
        sell_score: t.sell,
        reasons: t.reasons,
    }
}
