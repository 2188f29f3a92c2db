//! Indicator precomputation.
//!
//! The whole suite is computed once per analysis over the full window.
//! Series are inserted in suite order whatever order they were computed in.

use crate::components::indicator::{Indicator, IndicatorValues};
use crate::config::AnalysisConfig;
use crate::domain::Bar;
use crate::error::AnalysisError;

/// Named series produced by one indicator.
pub type IndicatorOutput = Vec<(String, Vec<f64>)>;

/// Compute every indicator in order on the current thread.
pub fn precompute_indicators(
    bars: &[Bar],
    indicators: &[Box<dyn Indicator>],
) -> Result<IndicatorValues, AnalysisError> {
    let outputs = indicators
        .iter()
        .map(|indicator| indicator.compute(bars))
        .collect::<Vec<_>>();
    collect_outputs(bars.len(), indicators, outputs)
}

/// Fold per-indicator results into one container, in suite order.
///
/// The first error in suite order wins, so a failing window reports the same
/// error no matter how the work was scheduled.
pub fn collect_outputs(
    bar_count: usize,
    indicators: &[Box<dyn Indicator>],
    outputs: Vec<Result<IndicatorOutput, AnalysisError>>,
) -> Result<IndicatorValues, AnalysisError> {
    let mut iv = IndicatorValues::new(bar_count);
    for (indicator, output) in indicators.iter().zip(outputs) {
        for (name, series) in output? {
            debug_assert!(
                series.len() <= bar_count,
                "indicator '{}' produced {} values for {} bars",
                indicator.name(),
                series.len(),
                bar_count
            );
            iv.insert(name, series);
        }
    }
    Ok(iv)
}

/// The warmup is the maximum bar requirement across all indicators.
pub fn compute_warmup(indicators: &[Box<dyn Indicator>]) -> usize {
    indicators.iter().map(|i| i.warmup()).max().unwrap_or(0)
}

/// Bars an analysis needs: the configured floor or the suite warmup,
/// whichever is larger.
pub fn required_bars(config: &AnalysisConfig, indicators: &[Box<dyn Indicator>]) -> usize {
    config.min_bars.max(compute_warmup(indicators))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_bars, Ema, Macd, Sma};

    #[test]
    fn precompute_single_indicator() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let indicators: Vec<Box<dyn Indicator>> = vec![Box::new(Sma::new(3))];
        let iv = precompute_indicators(&bars, &indicators).unwrap();
        assert_eq!(iv.len(), 1);
        assert_eq!(iv.at_bar("sma_3", 1), None);
        // SMA at bar 2 = mean(10,11,12) = 11.0
        let val = iv.at_bar("sma_3", 2).unwrap();
        assert!((val - 11.0).abs() < 1e-10);
    }

    #[test]
    fn multi_series_indicator_inserts_all() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let indicators: Vec<Box<dyn Indicator>> =
            vec![Box::new(Macd::new(12, 26, 9)), Box::new(Ema::new(3))];
        let iv = precompute_indicators(&bars, &indicators).unwrap();
        assert_eq!(iv.len(), 4);
        assert!(iv.get_series("macd_histogram").is_some());
    }

    #[test]
    fn first_error_in_suite_order_wins() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let indicators: Vec<Box<dyn Indicator>> =
            vec![Box::new(Sma::new(5)), Box::new(Sma::new(4))];
        match precompute_indicators(&bars, &indicators) {
            Err(AnalysisError::InsufficientData { required, .. }) => assert_eq!(required, 5),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn compute_warmup_max() {
        let indicators: Vec<Box<dyn Indicator>> = vec![
            Box::new(Sma::new(5)),
            Box::new(Ema::new(20)),
            Box::new(Macd::new(12, 26, 9)), // 34
        ];
        assert_eq!(compute_warmup(&indicators), 34);
    }

    #[test]
    fn required_bars_respects_floor() {
        let indicators: Vec<Box<dyn Indicator>> = vec![Box::new(Sma::new(5))];
        assert_eq!(required_bars(&AnalysisConfig::default(), &indicators), 50);
        let indicators: Vec<Box<dyn Indicator>> = vec![Box::new(Sma::new(80))];
        assert_eq!(required_bars(&AnalysisConfig::default(), &indicators), 80);
    }
}
