//! Volatility breakout: a close that moves more than `multiplier` ATRs away
//! from the previous close.
//!
//! The ATR is measured over the bars before the last one, so the breakout
//! bar does not widen its own threshold.

use serde::{Deserialize, Serialize};

use super::{check_positive, require_bars, Strategy};
use crate::domain::{closes, highs, lows, Bar, Signal, SignalType};
use crate::error::AnalysisError;
use crate::indicators::atr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityBreakoutParams {
    pub atr_period: usize,
    pub multiplier: f64,
}

impl Default for VolatilityBreakoutParams {
    fn default() -> Self {
        Self {
            atr_period: 14,
            multiplier: 1.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VolatilityBreakout {
    params: VolatilityBreakoutParams,
}

impl VolatilityBreakout {
    pub fn new(params: VolatilityBreakoutParams) -> Result<Self, AnalysisError> {
        if params.atr_period == 0 {
            return Err(AnalysisError::InvalidPeriod {
                name: "atr_period",
                period: params.atr_period,
            });
        }
        check_positive("multiplier", params.multiplier)?;
        Ok(Self { params })
    }
}

impl Strategy for VolatilityBreakout {
    fn name(&self) -> &str {
        "volatility_breakout"
    }

    fn warmup_bars(&self) -> usize {
        self.params.atr_period + 2
    }

    fn compute_signal(&self, bars: &[Bar]) -> Result<Signal, AnalysisError> {
        let p = &self.params;
        let bar = require_bars(bars, self.warmup_bars())?;
        let history = &bars[..bars.len() - 1];
        let atr_series = atr(&highs(history), &lows(history), &closes(history), p.atr_period)?;
        let Some(&current_atr) = atr_series.last() else {
            return Ok(Signal::hold(bar, "atr unavailable"));
        };
        if current_atr <= 0.0 {
            return Ok(Signal::hold(bar, "zero volatility"));
        }

        let prev_close = history[history.len() - 1].close;
        let move_atrs = (bar.close - prev_close) / current_atr;
        let strength = (move_atrs.abs() / (2.0 * p.multiplier)).min(1.0);

        if move_atrs >= p.multiplier {
            Ok(Signal::new(
                bar,
                SignalType::Buy,
                strength,
                vec![format!("upside breakout of {move_atrs:.2} ATR")],
            ))
        } else if move_atrs <= -p.multiplier {
            Ok(Signal::new(
                bar,
                SignalType::Sell,
                strength,
                vec![format!("downside breakout of {:.2} ATR", move_atrs.abs())],
            ))
        } else {
            Ok(Signal::hold(bar, format!("move of {move_atrs:.2} ATR")))
        }
    }
}
