//! Fast/slow EMA crossover on the last bar.

use serde::{Deserialize, Serialize};

use super::{last_two, require_bars, Strategy};
use crate::domain::{closes, Bar, Signal, SignalType};
use crate::error::AnalysisError;
use crate::indicators::ema;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaCrossoverParams {
    pub fast: usize,
    pub slow: usize,
}

impl Default for MaCrossoverParams {
    fn default() -> Self {
        Self { fast: 12, slow: 26 }
    }
}

#[derive(Debug, Clone)]
pub struct MaCrossover {
    params: MaCrossoverParams,
}

impl MaCrossover {
    pub fn new(params: MaCrossoverParams) -> Result<Self, AnalysisError> {
        if params.fast == 0 || params.fast >= params.slow {
            return Err(AnalysisError::InvalidPeriod {
                name: "ma_crossover_fast",
                period: params.fast,
            });
        }
        Ok(Self { params })
    }
}

impl Strategy for MaCrossover {
    fn name(&self) -> &str {
        "ma_crossover"
    }

    fn warmup_bars(&self) -> usize {
        self.params.slow + 1
    }

    fn compute_signal(&self, bars: &[Bar]) -> Result<Signal, AnalysisError> {
        let p = &self.params;
        let bar = require_bars(bars, self.warmup_bars())?;
        let closes = closes(bars);
        let fast = ema(&closes, p.fast)?;
        let slow = ema(&closes, p.slow)?;
        let (Some((fast_prev, fast_now)), Some((slow_prev, slow_now))) =
            (last_two(&fast), last_two(&slow))
        else {
            return Ok(Signal::hold(bar, "crossover undefined"));
        };

        let spread = if slow_now != 0.0 {
            (fast_now - slow_now) / slow_now
        } else {
            0.0
        };
        // 1% separation on the crossing bar is full strength
        let strength = 0.5 + (spread.abs() * 50.0).min(0.5);

        if fast_prev <= slow_prev && fast_now > slow_now {
            return Ok(Signal::new(
                bar,
                SignalType::Buy,
                strength,
                vec![format!("EMA {} crossed above EMA {}", p.fast, p.slow)],
            ));
        }
        if fast_prev >= slow_prev && fast_now < slow_now {
            return Ok(Signal::new(
                bar,
                SignalType::Sell,
                strength,
                vec![format!("EMA {} crossed below EMA {}", p.fast, p.slow)],
            ));
        }
        Ok(Signal::hold(bar, "no crossover"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn strategy() -> MaCrossover {
        MaCrossover::new(MaCrossoverParams { fast: 3, slow: 6 }).unwrap()
    }

    #[test]
    fn golden_cross_on_reversal() {
        // decline, then a sharp rally; find the bar where fast overtakes slow
        let mut closes: Vec<f64> = (0..15).map(|i| 120.0 - i as f64).collect();
        closes.extend((1..=10).map(|i| 106.0 + 3.0 * i as f64));
        let bars = make_bars(&closes);
        let s = strategy();
        let buys: Vec<usize> = (s.warmup_bars()..=bars.len())
            .filter(|&end| s.compute_signal(&bars[..end]).unwrap().signal_type == SignalType::Buy)
            .collect();
        assert_eq!(buys.len(), 1);
        assert!(buys[0] > 15);
    }

    #[test]
    fn death_cross_on_reversal() {
        let mut closes: Vec<f64> = (0..15).map(|i| 80.0 + i as f64).collect();
        closes.extend((1..=10).map(|i| 94.0 - 3.0 * i as f64));
        let bars = make_bars(&closes);
        let s = strategy();
        let sells = (s.warmup_bars()..=bars.len())
            .filter(|&end| s.compute_signal(&bars[..end]).unwrap().signal_type == SignalType::Sell)
            .count();
        assert_eq!(sells, 1);
    }

    #[test]
    fn steady_trend_holds() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let s = strategy().compute_signal(&make_bars(&closes)).unwrap();
        assert_eq!(s.signal_type, SignalType::Hold);
    }

    #[test]
    fn fast_must_be_shorter() {
        assert!(MaCrossover::new(MaCrossoverParams { fast: 26, slow: 12 }).is_err());
    }
}
