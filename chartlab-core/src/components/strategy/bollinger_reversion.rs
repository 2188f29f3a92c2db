//! Bollinger band mean reversion.

use serde::{Deserialize, Serialize};

use super::{check_positive, last_two, require_bars, Strategy};
use crate::domain::{closes, Bar, Signal, SignalType};
use crate::error::AnalysisError;
use crate::indicators::bollinger_bands;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerReversionParams {
    pub period: usize,
    pub std_dev: f64,
}

impl Default for BollingerReversionParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev: 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BollingerReversion {
    params: BollingerReversionParams,
}

impl BollingerReversion {
    pub fn new(params: BollingerReversionParams) -> Result<Self, AnalysisError> {
        if params.period < 2 {
            return Err(AnalysisError::InvalidPeriod {
                name: "bollinger_reversion",
                period: params.period,
            });
        }
        check_positive("std_dev", params.std_dev)?;
        Ok(Self { params })
    }
}

impl Strategy for BollingerReversion {
    fn name(&self) -> &str {
        "bollinger_reversion"
    }

    fn warmup_bars(&self) -> usize {
        self.params.period + 1
    }

    fn compute_signal(&self, bars: &[Bar]) -> Result<Signal, AnalysisError> {
        let p = &self.params;
        let bar = require_bars(bars, self.warmup_bars())?;
        let closes = closes(bars);
        let bands = bollinger_bands(&closes, p.period, p.std_dev)?;
        let (Some(&upper), Some(&lower), Some((mid_prev, mid_now))) = (
            bands.upper.last(),
            bands.lower.last(),
            last_two(&bands.middle),
        ) else {
            return Ok(Signal::hold(bar, "bands undefined"));
        };
        let Some((close_prev, close_now)) = last_two(&closes) else {
            return Ok(Signal::hold(bar, "bands undefined"));
        };

        let half_width = (upper - mid_now).max(f64::EPSILON);
        if close_now < lower {
            let strength = 0.5 + (lower - close_now) / half_width;
            return Ok(Signal::new(
                bar,
                SignalType::Buy,
                strength,
                vec![format!("close {close_now:.2} below lower band {lower:.2}")],
            ));
        }
        if close_now > upper {
            let strength = 0.5 + (close_now - upper) / half_width;
            return Ok(Signal::new(
                bar,
                SignalType::Sell,
                strength,
                vec![format!("close {close_now:.2} above upper band {upper:.2}")],
            ));
        }
        let was_below = close_prev < mid_prev;
        let is_below = close_now < mid_now;
        if was_below != is_below {
            return Ok(Signal::new(
                bar,
                SignalType::Exit,
                0.5,
                vec![format!("close crossed middle band {mid_now:.2}")],
            ));
        }
        Ok(Signal::hold(bar, "inside bands"))
    }
}
