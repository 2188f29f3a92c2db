//! Indicator trait and computed indicator values container.
//!
//! Indicators are pure functions: bar window in, one or more named numeric
//! series out. Each series is aligned to the END of the window, so the last
//! value of every series refers to the last bar.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::error::AnalysisError;

/// Trait for indicators run by the analysis engine.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on price data from bar t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "macd").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces its first value.
    fn warmup(&self) -> usize;

    /// Compute every series this indicator publishes, in a fixed order.
    fn compute(&self, bars: &[Bar]) -> Result<Vec<(String, Vec<f64>)>, AnalysisError>;
}

/// Named indicator series computed over one bar window.
///
/// Series are shorter than the window by their warm-up. Lookup by bar index
/// goes through [`IndicatorValues::at_bar`], which applies the offset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValues {
    bar_count: usize,
    series: BTreeMap<String, Vec<f64>>,
}

impl IndicatorValues {
    pub fn new(bar_count: usize) -> Self {
        Self {
            bar_count,
            series: BTreeMap::new(),
        }
    }

    /// Insert a named indicator series.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Get the full series for a named indicator.
    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    /// Most recent value of a series.
    pub fn last(&self, name: &str) -> Option<f64> {
        self.series.get(name).and_then(|v| v.last().copied())
    }

    /// Number of leading bars without a value for `name`.
    pub fn offset(&self, name: &str) -> Option<usize> {
        self.series
            .get(name)
            .map(|v| self.bar_count.saturating_sub(v.len()))
    }

    /// Value of `name` at window bar index `bar_index`, if it has one.
    pub fn at_bar(&self, name: &str, bar_index: usize) -> Option<f64> {
        let values = self.series.get(name)?;
        let offset = self.bar_count.checked_sub(values.len())?;
        bar_index
            .checked_sub(offset)
            .and_then(|i| values.get(i).copied())
    }

    pub fn bar_count(&self) -> usize {
        self.bar_count
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Number of indicator series stored.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
