//! Momentum (price difference) and Rate of Change (percentage difference)
//! against the value `period` bars back. Both have `n - period` values.

use super::{check_finite, check_period, or_neutral, require_len};
use crate::components::indicator::Indicator;
use crate::domain::{closes, Bar};
use crate::error::AnalysisError;

pub fn momentum(values: &[f64], period: usize) -> Result<Vec<f64>, AnalysisError> {
    check_period("momentum", period)?;
    require_len(values.len(), period + 1)?;
    check_finite(values)?;
    Ok((period..values.len())
        .map(|i| values[i] - values[i - period])
        .collect())
}

/// Percent change; a zero base price reports 0.
pub fn roc(values: &[f64], period: usize) -> Result<Vec<f64>, AnalysisError> {
    check_period("roc", period)?;
    require_len(values.len(), period + 1)?;
    check_finite(values)?;
    Ok((period..values.len())
        .map(|i| {
            let base = values[i - period];
            or_neutral((values[i] - base) / base * 100.0, 0.0)
        })
        .collect())
}

#[derive(Debug, Clone)]
pub struct Momentum {
    period: usize,
    name: String,
}

impl Momentum {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("momentum_{period}"),
        }
    }
}

impl Indicator for Momentum {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<(String, Vec<f64>)>, AnalysisError> {
        Ok(vec![(self.name.clone(), momentum(&closes(bars), self.period)?)])
    }
}

#[derive(Debug, Clone)]
pub struct Roc {
    period: usize,
    name: String,
}

impl Roc {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("roc_{period}"),
        }
    }
}

impl Indicator for Roc {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, bars: &[Bar]) -> Result<Vec<(String, Vec<f64>)>, AnalysisError> {
        Ok(vec![(self.name.clone(), roc(&closes(bars), self.period)?)])
    }
}
