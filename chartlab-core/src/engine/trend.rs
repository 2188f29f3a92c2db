//! Trend classification from the fast/slow EMA pair.

use serde::{Deserialize, Serialize};

use crate::config::TrendConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Bullish,
    Bearish,
    Sideways,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// 0.0 to 1.0.
    pub strength: f64,
    /// Consecutive bars, counted back from the last, over which the fast
    /// EMA kept moving in the trend direction. Bounded by the lookback.
    pub duration: usize,
}

impl Trend {
    pub fn sideways() -> Self {
        Self {
            direction: TrendDirection::Sideways,
            strength: 0.0,
            duration: 0,
        }
    }
}

/// Classify the last `config.lookback` values of `fast` against `slow`.
///
/// Bullish needs the fast EMA above the slow one and non-decreasing at
/// every step of the window; bearish mirrors this. A single violation
/// makes the trend sideways.
pub fn classify(fast: &[f64], slow: &[f64], config: &TrendConfig) -> Trend {
    let len = config.lookback.min(fast.len()).min(slow.len());
    if len < 2 {
        return Trend::sideways();
    }
    let window = &fast[fast.len() - len..];
    let (Some(&fast_last), Some(&slow_last)) = (fast.last(), slow.last()) else {
        return Trend::sideways();
    };

    let direction = if fast_last > slow_last && window.windows(2).all(|w| w[1] >= w[0]) {
        TrendDirection::Bullish
    } else if fast_last < slow_last && window.windows(2).all(|w| w[1] <= w[0]) {
        TrendDirection::Bearish
    } else {
        return Trend::sideways();
    };

    let consistent = |w: &[f64]| match direction {
        TrendDirection::Bullish => w[1] >= w[0],
        _ => w[1] <= w[0],
    };
    let steps = len - 1;
    let consistent_steps = window.windows(2).filter(|w| consistent(*w)).count();
    let run = window.windows(2).rev().take_while(|w| consistent(*w)).count();

    let first = window[0];
    let pct = if first != 0.0 {
        (fast_last - first) / first
    } else {
        0.0
    };
    let magnitude = (pct.abs() * config.pct_scale).min(1.0);
    let consistency = consistent_steps as f64 / steps as f64;
    let strength = 0.5 * magnitude + 0.5 * consistency;

    Trend {
        direction,
        strength: if strength.is_finite() { strength } else { 0.0 },
        duration: run + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> TrendConfig {
        TrendConfig::default()
    }

    #[test]
    fn rising_stack_is_bullish() {
        let fast: Vec<f64> = (0..30).map(|i| 110.0 + i as f64).collect();
        let slow: Vec<f64> = (0..30).map(|i| 100.0 + i as f64 * 0.5).collect();
        let t = classify(&fast, &slow, &cfg());
        assert_eq!(t.direction, TrendDirection::Bullish);
        assert_eq!(t.duration, 10);
        assert!(t.strength > 0.5 && t.strength <= 1.0);
    }

    #[test]
    fn falling_stack_is_bearish() {
        let fast: Vec<f64> = (0..30).map(|i| 90.0 - i as f64).collect();
        let slow: Vec<f64> = vec![100.0; 30];
        let t = classify(&fast, &slow, &cfg());
        assert_eq!(t.direction, TrendDirection::Bearish);
        assert_eq!(t.duration, 10);
    }

    #[test]
    fn single_violation_is_sideways() {
        let mut fast: Vec<f64> = (0..30).map(|i| 110.0 + i as f64).collect();
        fast[25] = 200.0;
        let slow = vec![100.0; 30];
        assert_eq!(classify(&fast, &slow, &cfg()), Trend::sideways());
    }

    #[test]
    fn violation_outside_window_is_ignored() {
        let mut fast: Vec<f64> = (0..30).map(|i| 110.0 + i as f64).collect();
        fast[5] = 500.0;
        let slow = vec![100.0; 30];
        assert_eq!(classify(&fast, &slow, &cfg()).direction, TrendDirection::Bullish);
    }

    #[test]
    fn flat_equal_emas_are_sideways() {
        let flat = vec![50.0; 20];
        assert_eq!(classify(&flat, &flat, &cfg()), Trend::sideways());
    }

    #[test]
    fn short_series_bound_the_window() {
        let fast = [101.0, 102.0, 103.0];
        let slow = [100.0, 100.5, 101.0];
        let t = classify(&fast, &slow, &cfg());
        assert_eq!(t.direction, TrendDirection::Bullish);
        assert_eq!(t.duration, 3);
    }

    #[test]
    fn too_short_is_sideways() {
        assert_eq!(classify(&[1.0], &[0.5], &cfg()), Trend::sideways());
    }
}
