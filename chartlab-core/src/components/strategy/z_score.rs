//! Z-score mean reversion.
//!
//! Stretched far below the trailing mean is a buy, far above is a sell,
//! and back near the mean is an exit.

use serde::{Deserialize, Serialize};

use super::{check_positive, require_bars, Strategy};
use crate::domain::{closes, Bar, Signal, SignalType};
use crate::error::AnalysisError;
use crate::indicators::z_score;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZScoreParams {
    pub period: usize,
    pub entry: f64,
    pub exit: f64,
}

impl Default for ZScoreParams {
    fn default() -> Self {
        Self {
            period: 20,
            entry: 2.0,
            exit: 0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ZScore {
    params: ZScoreParams,
}

impl ZScore {
    pub fn new(params: ZScoreParams) -> Result<Self, AnalysisError> {
        if params.period < 2 {
            return Err(AnalysisError::InvalidPeriod {
                name: "z_score",
                period: params.period,
            });
        }
        check_positive("entry", params.entry)?;
        if !params.exit.is_finite() || params.exit < 0.0 || params.exit >= params.entry {
            return Err(AnalysisError::InvalidParameter {
                name: "exit",
                value: params.exit,
            });
        }
        Ok(Self { params })
    }
}

impl Strategy for ZScore {
    fn name(&self) -> &str {
        "z_score"
    }

    fn warmup_bars(&self) -> usize {
        self.params.period
    }

    fn compute_signal(&self, bars: &[Bar]) -> Result<Signal, AnalysisError> {
        let p = &self.params;
        let bar = require_bars(bars, p.period)?;
        let tail = closes(&bars[bars.len() - p.period..]);
        let z = z_score(&tail, p.period)?;
        let strength = (z.abs() / (2.0 * p.entry)).min(1.0);

        let signal = if z <= -p.entry {
            Signal::new(bar, SignalType::Buy, strength, vec![format!("z-score {z:.2} below -{}", p.entry)])
        } else if z >= p.entry {
            Signal::new(bar, SignalType::Sell, strength, vec![format!("z-score {z:.2} above {}", p.entry)])
        } else if z.abs() <= p.exit {
            Signal::new(
                bar,
                SignalType::Exit,
                1.0 - z.abs() / p.entry,
                vec![format!("z-score {z:.2} reverted to mean")],
            )
        } else {
            Signal::hold(bar, format!("z-score {z:.2}"))
        };
        Ok(signal)
    }
}
