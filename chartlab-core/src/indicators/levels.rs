//! Stateless price-level formulas: classic floor pivots and Fibonacci
//! retracements.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::error::AnalysisError;

/// Retracement ratios, from the high (0%) down to the low (100%).
pub const FIBONACCI_RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotPoints {
    pub pivot: f64,
    pub r1: f64,
    pub r2: f64,
    pub r3: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
}

/// Floor pivots for the next session from the previous bar's high/low/close.
pub fn pivot_points(high: f64, low: f64, close: f64) -> Result<PivotPoints, AnalysisError> {
    for (name, value) in [("high", high), ("low", low), ("close", close)] {
        if !value.is_finite() {
            return Err(AnalysisError::InvalidParameter { name, value });
        }
    }
    let pivot = (high + low + close) / 3.0;
    let range = high - low;
    Ok(PivotPoints {
        pivot,
        r1: 2.0 * pivot - low,
        r2: pivot + range,
        r3: high + 2.0 * (pivot - low),
        s1: 2.0 * pivot - high,
        s2: pivot - range,
        s3: low - 2.0 * (high - pivot),
    })
}

impl PivotPoints {
    pub fn from_bar(bar: &Bar) -> Result<Self, AnalysisError> {
        pivot_points(bar.high, bar.low, bar.close)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevel {
    pub ratio: f64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevels {
    pub high: f64,
    pub low: f64,
    pub levels: Vec<FibonacciLevel>,
}

/// Retracement prices between a swing `high` and `low` (`high >= low`).
pub fn fibonacci_retracement(high: f64, low: f64) -> Result<FibonacciLevels, AnalysisError> {
    if !high.is_finite() {
        return Err(AnalysisError::InvalidParameter {
            name: "high",
            value: high,
        });
    }
    if !low.is_finite() || low > high {
        return Err(AnalysisError::InvalidParameter {
            name: "low",
            value: low,
        });
    }
    let range = high - low;
    Ok(FibonacciLevels {
        high,
        low,
        levels: FIBONACCI_RATIOS
            .iter()
            .map(|&ratio| FibonacciLevel {
                ratio,
                price: high - range * ratio,
            })
            .collect(),
    })
}
