//! RSI mean reversion: enter when RSI climbs back out of an extreme zone,
//! exit when it crosses the midline.

use serde::{Deserialize, Serialize};

use super::{last_two, require_bars, Strategy};
use crate::domain::{closes, Bar, Signal, SignalType};
use crate::error::AnalysisError;
use crate::indicators::rsi;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiReversionParams {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiReversionParams {
    fn default() -> Self {
        Self {
            period: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RsiReversion {
    params: RsiReversionParams,
}

impl RsiReversion {
    pub fn new(params: RsiReversionParams) -> Result<Self, AnalysisError> {
        if params.period == 0 {
            return Err(AnalysisError::InvalidPeriod {
                name: "rsi_reversion",
                period: params.period,
            });
        }
        if !(0.0..50.0).contains(&params.oversold) {
            return Err(AnalysisError::InvalidParameter {
                name: "oversold",
                value: params.oversold,
            });
        }
        if !(params.overbought > 50.0 && params.overbought <= 100.0) {
            return Err(AnalysisError::InvalidParameter {
                name: "overbought",
                value: params.overbought,
            });
        }
        Ok(Self { params })
    }
}

impl Strategy for RsiReversion {
    fn name(&self) -> &str {
        "rsi_reversion"
    }

    fn warmup_bars(&self) -> usize {
        self.params.period + 2
    }

    fn compute_signal(&self, bars: &[Bar]) -> Result<Signal, AnalysisError> {
        let p = &self.params;
        let bar = require_bars(bars, self.warmup_bars())?;
        let series = rsi(&closes(bars), p.period)?;
        let Some((prev, curr)) = last_two(&series) else {
            return Ok(Signal::hold(bar, "rsi undefined"));
        };

        if prev < p.oversold && curr >= p.oversold {
            let strength = (p.oversold - prev) / p.oversold + 0.5;
            return Ok(Signal::new(
                bar,
                SignalType::Buy,
                strength,
                vec![format!("RSI left oversold ({prev:.1} -> {curr:.1})")],
            ));
        }
        if prev > p.overbought && curr <= p.overbought {
            let strength = (prev - p.overbought) / (100.0 - p.overbought) + 0.5;
            return Ok(Signal::new(
                bar,
                SignalType::Sell,
                strength,
                vec![format!("RSI left overbought ({prev:.1} -> {curr:.1})")],
            ));
        }
        if (prev - 50.0).signum() != (curr - 50.0).signum() && prev != 50.0 {
            return Ok(Signal::new(
                bar,
                SignalType::Exit,
                0.5,
                vec![format!("RSI crossed midline ({prev:.1} -> {curr:.1})")],
            ));
        }
        Ok(Signal::hold(bar, format!("RSI {curr:.1}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn strategy() -> RsiReversion {
        RsiReversion::new(RsiReversionParams {
            period: 5,
            ..RsiReversionParams::default()
        })
        .unwrap()
    }

    fn signals(closes: &[f64]) -> Vec<SignalType> {
        let bars = make_bars(closes);
        let s = strategy();
        (s.warmup_bars()..=bars.len())
            .map(|end| s.compute_signal(&bars[..end]).unwrap().signal_type)
            .collect()
    }

    #[test]
    fn recovery_from_selloff_buys() {
        let mut closes: Vec<f64> = (0..10).map(|i| 100.0 - 2.0 * i as f64).collect();
        closes.extend([85.0, 88.0]);
        assert!(signals(&closes).contains(&SignalType::Buy));
    }

    #[test]
    fn fade_from_rally_sells() {
        let mut closes: Vec<f64> = (0..10).map(|i| 100.0 + 2.0 * i as f64).collect();
        closes.extend([115.0, 112.0]);
        assert!(signals(&closes).contains(&SignalType::Sell));
    }

    #[test]
    fn persistent_decline_never_buys() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        assert!(!signals(&closes).contains(&SignalType::Buy));
    }

    #[test]
    fn thresholds_validated() {
        let params = RsiReversionParams {
            oversold: 60.0,
            ..RsiReversionParams::default()
        };
        assert!(RsiReversion::new(params).is_err());
    }
}
