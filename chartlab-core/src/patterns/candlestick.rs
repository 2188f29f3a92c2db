//! Candlestick patterns: doji, hammer, shooting star and engulfing pairs.
//!
//! Each predicate looks at one bar (or a bar and its predecessor) and keeps
//! no state. Bars with zero range carry no shape and never match.

use super::{PatternKind, PatternMatch, PatternSignal};
use crate::config::CandlestickConfig;
use crate::domain::Bar;

/// Scan the last `config.lookback` bars.
pub fn detect(bars: &[Bar], config: &CandlestickConfig) -> Vec<PatternMatch> {
    let start = bars.len().saturating_sub(config.lookback);
    let mut found = Vec::new();
    for i in start..bars.len() {
        found.extend(single_bar(&bars[i], i, config));
        if i > 0 {
            found.extend(engulfing(&bars[i - 1], &bars[i], i));
        }
    }
    found
}

fn single_bar(bar: &Bar, index: usize, config: &CandlestickConfig) -> Vec<PatternMatch> {
    let mut found = Vec::new();
    let range = bar.range();
    if range <= 0.0 {
        return found;
    }
    let body = bar.body();
    let upper = bar.upper_shadow();
    let lower = bar.lower_shadow();

    let body_ratio = body / range;
    if body_ratio < config.doji_body_ratio {
        let confidence = (1.0 - body_ratio / config.doji_body_ratio).clamp(0.5, 0.95);
        found.push(
            PatternMatch::new(
                PatternKind::Doji,
                confidence,
                index,
                index,
                format!("doji at bar {index}: body is {:.1}% of range", body_ratio * 100.0),
            )
            .with_signal(PatternSignal::Indecision),
        );
    }

    if body > 0.0 {
        let long_shadow = config.shadow_ratio * body;
        let short_shadow = config.opposite_shadow_ratio * body;

        if lower > long_shadow && upper < short_shadow {
            found.push(
                PatternMatch::new(
                    PatternKind::Hammer,
                    shadow_confidence(lower, body, config.shadow_ratio),
                    index,
                    index,
                    format!("hammer at bar {index}: lower shadow {:.1}x body", lower / body),
                )
                .with_signal(PatternSignal::BullishReversal),
            );
        }

        if upper > long_shadow && lower < short_shadow {
            found.push(
                PatternMatch::new(
                    PatternKind::ShootingStar,
                    shadow_confidence(upper, body, config.shadow_ratio),
                    index,
                    index,
                    format!("shooting star at bar {index}: upper shadow {:.1}x body", upper / body),
                )
                .with_signal(PatternSignal::BearishReversal),
            );
        }
    }
    found
}

fn engulfing(prev: &Bar, curr: &Bar, index: usize) -> Option<PatternMatch> {
    let prev_body = prev.body();
    let body = curr.body();
    if prev_body <= 0.0 || body <= prev_body {
        return None;
    }
    let confidence = (0.5 + body / prev_body * 0.1).min(0.9);

    if prev.is_bearish()
        && curr.is_bullish()
        && curr.open <= prev.close
        && curr.close >= prev.open
    {
        return Some(
            PatternMatch::new(
                PatternKind::BullishEngulfing,
                confidence,
                index - 1,
                index,
                format!("bullish engulfing at bars {}-{index}", index - 1),
            )
            .with_signal(PatternSignal::BullishReversal),
        );
    }

    if prev.is_bullish()
        && curr.is_bearish()
        && curr.open >= prev.close
        && curr.close <= prev.open
    {
        return Some(
            PatternMatch::new(
                PatternKind::BearishEngulfing,
                confidence,
                index - 1,
                index,
                format!("bearish engulfing at bars {}-{index}", index - 1),
            )
            .with_signal(PatternSignal::BearishReversal),
        );
    }
    None
}

fn shadow_confidence(shadow: f64, body: f64, shadow_ratio: f64) -> f64 {
    (shadow / body / shadow_ratio * 0.4 + 0.5).min(0.9)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn bar(i: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        Bar::new(base + Duration::days(i), open, high, low, close, 1000.0)
    }

    fn kinds(found: &[PatternMatch]) -> Vec<PatternKind> {
        found.iter().map(|m| m.kind).collect()
    }

    #[test]
    fn doji_detected() {
        let bars = vec![bar(0, 100.0, 105.0, 95.0, 100.2)];
        let found = detect(&bars, &CandlestickConfig::default());
        assert_eq!(kinds(&found), vec![PatternKind::Doji]);
        assert!(found[0].confidence >= 0.5);
    }

    #[test]
    fn hammer_detected() {
        // body 1, lower shadow 5, upper shadow 0.2
        let bars = vec![bar(0, 100.0, 101.2, 95.0, 101.0)];
        let found = detect(&bars, &CandlestickConfig::default());
        assert_eq!(kinds(&found), vec![PatternKind::Hammer]);
        assert_eq!(found[0].signals, vec![PatternSignal::BullishReversal]);
    }

    #[test]
    fn shooting_star_detected() {
        let bars = vec![bar(0, 101.0, 106.0, 99.9, 100.0)];
        let found = detect(&bars, &CandlestickConfig::default());
        assert_eq!(kinds(&found), vec![PatternKind::ShootingStar]);
    }

    #[test]
    fn bullish_engulfing_detected() {
        let bars = vec![
            bar(0, 102.0, 102.5, 100.5, 101.0),
            bar(1, 100.8, 103.5, 100.5, 103.0),
        ];
        let found = detect(&bars, &CandlestickConfig::default());
        assert!(kinds(&found).contains(&PatternKind::BullishEngulfing));
        let m = found
            .iter()
            .find(|m| m.kind == PatternKind::BullishEngulfing)
            .unwrap();
        assert_eq!((m.start_index, m.end_index), (0, 1));
    }

    #[test]
    fn bearish_engulfing_detected() {
        let bars = vec![
            bar(0, 100.0, 101.5, 99.5, 101.0),
            bar(1, 101.2, 101.5, 98.5, 99.0),
        ];
        let found = detect(&bars, &CandlestickConfig::default());
        assert!(kinds(&found).contains(&PatternKind::BearishEngulfing));
    }

    #[test]
    fn zero_range_bar_matches_nothing() {
        let bars = vec![bar(0, 50.0, 50.0, 50.0, 50.0), bar(1, 50.0, 50.0, 50.0, 50.0)];
        assert!(detect(&bars, &CandlestickConfig::default()).is_empty());
    }

    #[test]
    fn only_lookback_bars_are_scanned() {
        let mut bars = vec![bar(0, 100.0, 105.0, 95.0, 100.2)]; // doji
        for i in 1..10 {
            let p = 100.0 + i as f64;
            bars.push(bar(i, p, p + 1.2, p - 0.1, p + 1.0));
        }
        let found = detect(&bars, &CandlestickConfig::default());
        assert!(found.iter().all(|m| m.end_index >= 5));
    }
}
