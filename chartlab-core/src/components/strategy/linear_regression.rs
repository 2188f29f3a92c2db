//! Linear regression trend strategy.
//!
//! Fits a least-squares line through the last `period` closes. A steep,
//! well-fitting line is a trend entry; a line that no longer explains the
//! closes is an exit.

use serde::{Deserialize, Serialize};

use super::{check_positive, require_bars, Strategy};
use crate::domain::{closes, Bar, Signal, SignalType};
use crate::error::AnalysisError;
use crate::patterns::regression::linear_fit_series;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearRegressionParams {
    pub period: usize,
    /// Per-bar slope relative to the window mean, e.g. 0.002 = 0.2% per bar.
    pub slope_threshold: f64,
    pub min_r2: f64,
    pub exit_r2: f64,
}

impl Default for LinearRegressionParams {
    fn default() -> Self {
        Self {
            period: 20,
            slope_threshold: 0.002,
            min_r2: 0.6,
            exit_r2: 0.2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinearRegression {
    params: LinearRegressionParams,
}

impl LinearRegression {
    pub fn new(params: LinearRegressionParams) -> Result<Self, AnalysisError> {
        if params.period < 2 {
            return Err(AnalysisError::InvalidPeriod {
                name: "linear_regression",
                period: params.period,
            });
        }
        check_positive("slope_threshold", params.slope_threshold)?;
        if !(0.0..=1.0).contains(&params.min_r2) {
            return Err(AnalysisError::InvalidParameter {
                name: "min_r2",
                value: params.min_r2,
            });
        }
        if !(0.0..=params.min_r2).contains(&params.exit_r2) {
            return Err(AnalysisError::InvalidParameter {
                name: "exit_r2",
                value: params.exit_r2,
            });
        }
        Ok(Self { params })
    }
}

impl Strategy for LinearRegression {
    fn name(&self) -> &str {
        "linear_regression"
    }

    fn warmup_bars(&self) -> usize {
        self.params.period
    }

    fn compute_signal(&self, bars: &[Bar]) -> Result<Signal, AnalysisError> {
        let p = &self.params;
        let bar = require_bars(bars, p.period)?;
        let window = closes(&bars[bars.len() - p.period..]);
        let Some(fit) = linear_fit_series(&window) else {
            return Ok(Signal::hold(bar, "regression undefined"));
        };
        let mean = window.iter().sum::<f64>() / window.len() as f64;
        if mean == 0.0 {
            return Ok(Signal::hold(bar, "zero mean price"));
        }
        let slope = fit.slope / mean;
        let strength = fit.r_squared * (slope.abs() / (2.0 * p.slope_threshold)).min(1.0);

        if fit.r_squared >= p.min_r2 && slope >= p.slope_threshold {
            return Ok(Signal::new(
                bar,
                SignalType::Buy,
                strength,
                vec![format!(
                    "uptrend slope {:.3}%/bar, r2 {:.2}",
                    slope * 100.0,
                    fit.r_squared
                )],
            ));
        }
        if fit.r_squared >= p.min_r2 && slope <= -p.slope_threshold {
            return Ok(Signal::new(
                bar,
                SignalType::Sell,
                strength,
                vec![format!(
                    "downtrend slope {:.3}%/bar, r2 {:.2}",
                    slope * 100.0,
                    fit.r_squared
                )],
            ));
        }
        if fit.r_squared < p.exit_r2 {
            return Ok(Signal::new(
                bar,
                SignalType::Exit,
                1.0 - fit.r_squared,
                vec![format!("trend fit lost, r2 {:.2}", fit.r_squared)],
            ));
        }
        Ok(Signal::hold(bar, "no regression trend"))
    }
}
