//! Rate-of-change momentum.

use serde::{Deserialize, Serialize};

use super::{check_positive, last_two, require_bars, Strategy};
use crate::domain::{closes, Bar, Signal, SignalType};
use crate::error::AnalysisError;
use crate::indicators::roc;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumParams {
    pub period: usize,
    /// Percent change over `period` bars that counts as momentum.
    pub threshold: f64,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self {
            period: 10,
            threshold: 5.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MomentumStrategy {
    params: MomentumParams,
}

impl MomentumStrategy {
    pub fn new(params: MomentumParams) -> Result<Self, AnalysisError> {
        if params.period == 0 {
            return Err(AnalysisError::InvalidPeriod {
                name: "momentum",
                period: params.period,
            });
        }
        check_positive("threshold", params.threshold)?;
        Ok(Self { params })
    }
}

impl Strategy for MomentumStrategy {
    fn name(&self) -> &str {
        "momentum"
    }

    fn warmup_bars(&self) -> usize {
        self.params.period + 1
    }

    fn compute_signal(&self, bars: &[Bar]) -> Result<Signal, AnalysisError> {
        let p = &self.params;
        let bar = require_bars(bars, self.warmup_bars())?;
        let series = roc(&closes(bars), p.period)?;
        let Some(&curr) = series.last() else {
            return Ok(Signal::hold(bar, "roc undefined"));
        };
        let strength = (curr.abs() / (2.0 * p.threshold)).min(1.0);

        if curr >= p.threshold {
            return Ok(Signal::new(
                bar,
                SignalType::Buy,
                strength,
                vec![format!("{}-bar ROC {curr:.2}%", p.period)],
            ));
        }
        if curr <= -p.threshold {
            return Ok(Signal::new(
                bar,
                SignalType::Sell,
                strength,
                vec![format!("{}-bar ROC {curr:.2}%", p.period)],
            ));
        }
        // momentum flipped sign this bar
        if let Some((prev, _)) = last_two(&series) {
            if prev != 0.0 && prev.signum() != curr.signum() {
                return Ok(Signal::new(
                    bar,
                    SignalType::Exit,
                    0.5,
                    vec![format!("ROC turned from {prev:.2}% to {curr:.2}%")],
                ));
            }
        }
        Ok(Signal::hold(bar, format!("{}-bar ROC {curr:.2}%", p.period)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn strategy() -> MomentumStrategy {
        MomentumStrategy::new(MomentumParams::default()).unwrap()
    }

    #[test]
    fn strong_rise_is_buy() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let s = strategy().compute_signal(&make_bars(&closes)).unwrap();
        assert_eq!(s.signal_type, SignalType::Buy);
    }

    #[test]
    fn strong_fall_is_sell() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let s = strategy().compute_signal(&make_bars(&closes)).unwrap();
        assert_eq!(s.signal_type, SignalType::Sell);
        assert!(s.strength > 0.5);
    }

    #[test]
    fn sign_flip_is_exit() {
        // closes[10] vs [0] is +1%, closes[11] vs [1] is -1%
        let mut closes = vec![100.0, 102.0];
        closes.extend([101.0; 8]);
        closes.extend([101.0, 100.98]);
        let s = strategy().compute_signal(&make_bars(&closes)).unwrap();
        assert_eq!(s.signal_type, SignalType::Exit);
    }

    #[test]
    fn flat_holds() {
        let s = strategy().compute_signal(&make_bars(&[100.0; 12])).unwrap();
        assert_eq!(s.signal_type, SignalType::Hold);
    }
}
