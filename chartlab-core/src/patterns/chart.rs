//! Extremum-based chart patterns: double top/bottom, head-and-shoulders
//! (regular and inverse) and triangles.
//!
//! Patterns are matched against the most recent qualifying extrema only:
//! the last two for double patterns, the last three for head-and-shoulders
//! and up to `triangle.max_points` for triangle trend lines.

use super::extrema::{find_peaks, find_troughs, Extremum};
use super::regression::{linear_fit, LinearFit};
use super::{PatternKind, PatternMatch, PatternSignal};
use crate::config::{ChartPatternConfig, PatternConfig, TriangleConfig};
use crate::domain::{highs, lows, Bar};

pub fn detect(bars: &[Bar], config: &PatternConfig) -> Vec<PatternMatch> {
    let highs = highs(bars);
    let lows = lows(bars);
    let peaks = find_peaks(&highs, &config.extrema);
    let troughs = find_troughs(&lows, &config.extrema);

    let mut found = Vec::new();
    found.extend(double_top(&peaks, &lows, &config.chart));
    found.extend(double_bottom(&troughs, &highs, &config.chart));
    found.extend(head_and_shoulders(&peaks, &lows, &config.chart));
    found.extend(inverse_head_and_shoulders(&troughs, &highs, &config.chart));
    found.extend(triangle(&peaks, &troughs, bars.len(), &config.triangle));
    found
}

fn last_n<const N: usize>(points: &[Extremum]) -> Option<[Extremum; N]> {
    let tail = points.get(points.len().checked_sub(N)?..)?;
    tail.try_into().ok()
}

fn lowest(values: &[f64], from: usize, to: usize) -> f64 {
    values[from..=to].iter().copied().fold(f64::INFINITY, f64::min)
}

fn highest(values: &[f64], from: usize, to: usize) -> f64 {
    values[from..=to]
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Blend of price similarity (60%) and time separation (40%).
fn double_confidence(diff: f64, separation: usize, config: &ChartPatternConfig) -> f64 {
    let similarity = 1.0 - diff / config.double_tolerance;
    let spread = (separation as f64 / (3 * config.min_separation) as f64).min(1.0);
    0.6 * similarity + 0.4 * spread
}

fn relative_diff(a: f64, b: f64) -> f64 {
    let scale = a.abs().max(b.abs());
    if scale == 0.0 {
        0.0
    } else {
        (a - b).abs() / scale
    }
}

fn double_top(peaks: &[Extremum], lows: &[f64], config: &ChartPatternConfig) -> Option<PatternMatch> {
    let [first, second] = last_n::<2>(peaks)?;
    let separation = second.index - first.index;
    let diff = relative_diff(first.price, second.price);
    if separation < config.min_separation || diff > config.double_tolerance {
        return None;
    }
    let top = first.price.max(second.price);
    let neckline = lowest(lows, first.index, second.index);
    let height = top - neckline;

    Some(
        PatternMatch::new(
            PatternKind::DoubleTop,
            double_confidence(diff, separation, config),
            first.index,
            second.index,
            format!(
                "double top at {:.2}/{:.2}, neckline {neckline:.2}",
                first.price, second.price
            ),
        )
        .with_signal(PatternSignal::SellNecklineBreak)
        .with_targets(Some(neckline - height), Some(top)),
    )
}

fn double_bottom(
    troughs: &[Extremum],
    highs: &[f64],
    config: &ChartPatternConfig,
) -> Option<PatternMatch> {
    let [first, second] = last_n::<2>(troughs)?;
    let separation = second.index - first.index;
    let diff = relative_diff(first.price, second.price);
    if separation < config.min_separation || diff > config.double_tolerance {
        return None;
    }
    let bottom = first.price.min(second.price);
    let neckline = highest(highs, first.index, second.index);
    let height = neckline - bottom;

    Some(
        PatternMatch::new(
            PatternKind::DoubleBottom,
            double_confidence(diff, separation, config),
            first.index,
            second.index,
            format!(
                "double bottom at {:.2}/{:.2}, neckline {neckline:.2}",
                first.price, second.price
            ),
        )
        .with_signal(PatternSignal::BuyNecklineBreak)
        .with_targets(Some(neckline + height), Some(bottom)),
    )
}

/// Blend of shoulder symmetry and head prominence, 50/50.
fn shoulders_confidence(shoulder_diff: f64, head_prominence: f64, config: &ChartPatternConfig) -> f64 {
    let symmetry = 1.0 - shoulder_diff / config.shoulder_tolerance;
    let prominence = (head_prominence / config.head_prominence_scale).min(1.0);
    0.5 * symmetry + 0.5 * prominence
}

fn spaced(points: &[Extremum; 3], min_separation: usize) -> bool {
    points[1].index - points[0].index >= min_separation
        && points[2].index - points[1].index >= min_separation
}

fn head_and_shoulders(
    peaks: &[Extremum],
    lows: &[f64],
    config: &ChartPatternConfig,
) -> Option<PatternMatch> {
    let points = last_n::<3>(peaks)?;
    let [left, head, right] = points;
    if !spaced(&points, config.min_separation) {
        return None;
    }
    if head.price <= left.price || head.price <= right.price {
        return None;
    }
    let shoulder_diff = relative_diff(left.price, right.price);
    if shoulder_diff > config.shoulder_tolerance {
        return None;
    }
    let head_prominence = (head.price - left.price.max(right.price)) / head.price.abs();
    let neckline = (lowest(lows, left.index, head.index) + lowest(lows, head.index, right.index)) / 2.0;

    Some(
        PatternMatch::new(
            PatternKind::HeadAndShoulders,
            shoulders_confidence(shoulder_diff, head_prominence, config),
            left.index,
            right.index,
            format!(
                "head and shoulders: head {:.2}, shoulders {:.2}/{:.2}, neckline {neckline:.2}",
                head.price, left.price, right.price
            ),
        )
        .with_signal(PatternSignal::SellNecklineBreak)
        .with_targets(Some(neckline - (head.price - neckline)), Some(head.price)),
    )
}

fn inverse_head_and_shoulders(
    troughs: &[Extremum],
    highs: &[f64],
    config: &ChartPatternConfig,
) -> Option<PatternMatch> {
    let points = last_n::<3>(troughs)?;
    let [left, head, right] = points;
    if !spaced(&points, config.min_separation) {
        return None;
    }
    if head.price >= left.price || head.price >= right.price {
        return None;
    }
    let shoulder_diff = relative_diff(left.price, right.price);
    if shoulder_diff > config.shoulder_tolerance {
        return None;
    }
    let head_prominence = (left.price.min(right.price) - head.price) / head.price.abs();
    let neckline =
        (highest(highs, left.index, head.index) + highest(highs, head.index, right.index)) / 2.0;

    Some(
        PatternMatch::new(
            PatternKind::InverseHeadAndShoulders,
            shoulders_confidence(shoulder_diff, head_prominence, config),
            left.index,
            right.index,
            format!(
                "inverse head and shoulders: head {:.2}, shoulders {:.2}/{:.2}, neckline {neckline:.2}",
                head.price, left.price, right.price
            ),
        )
        .with_signal(PatternSignal::BuyNecklineBreak)
        .with_targets(Some(neckline + (neckline - head.price)), Some(head.price)),
    )
}

fn recent(points: &[Extremum], bar_count: usize, config: &TriangleConfig) -> Vec<Extremum> {
    let cutoff = bar_count.saturating_sub(config.window);
    let in_window: Vec<Extremum> = points
        .iter()
        .filter(|p| p.index >= cutoff)
        .copied()
        .collect();
    let skip = in_window.len().saturating_sub(config.max_points);
    in_window[skip..].to_vec()
}

fn fit(points: &[Extremum]) -> Option<LinearFit> {
    let xs: Vec<f64> = points.iter().map(|p| p.index as f64).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.price).collect();
    linear_fit(&xs, &ys)
}

fn triangle(
    peaks: &[Extremum],
    troughs: &[Extremum],
    bar_count: usize,
    config: &TriangleConfig,
) -> Option<PatternMatch> {
    let peaks = recent(peaks, bar_count, config);
    let troughs = recent(troughs, bar_count, config);
    if peaks.len() < 2 || troughs.len() < 2 {
        return None;
    }
    let upper = fit(&peaks)?;
    let lower = fit(&troughs)?;

    let all = peaks.iter().chain(&troughs);
    let mean_price = all.clone().map(|p| p.price).sum::<f64>() / (peaks.len() + troughs.len()) as f64;
    if mean_price <= 0.0 {
        return None;
    }
    let upper_slope = upper.slope / mean_price;
    let lower_slope = lower.slope / mean_price;

    // Resistance must not rise and support must not fall.
    if upper_slope > config.flat_slope || lower_slope < -config.flat_slope {
        return None;
    }
    let upper_flat = upper_slope.abs() < config.flat_slope;
    let lower_flat = lower_slope.abs() < config.flat_slope;
    let kind = match (upper_flat, lower_flat) {
        (true, true) => return None,
        (true, false) => PatternKind::AscendingTriangle,
        (false, true) => PatternKind::DescendingTriangle,
        (false, false) => PatternKind::SymmetricalTriangle,
    };

    let closing_rate = upper.slope - lower.slope;
    if closing_rate >= 0.0 {
        return None;
    }
    let apex = (lower.intercept - upper.intercept) / closing_rate;
    let last = bar_count.saturating_sub(1) as f64;
    let horizon = apex - last;
    if !horizon.is_finite()
        || horizon < config.min_horizon as f64
        || horizon > config.max_horizon as f64
    {
        return None;
    }

    let start_index = all.clone().map(|p| p.index).min()?;
    let end_index = all.map(|p| p.index).max()?;
    let start = start_index as f64;
    let height = upper.value_at(start) - lower.value_at(start);
    let upper_now = upper.value_at(last);
    let lower_now = lower.value_at(last);

    let (signal, target, stop) = match kind {
        PatternKind::AscendingTriangle => (
            PatternSignal::BuyBreakout,
            Some(upper_now + height),
            Some(lower_now),
        ),
        PatternKind::DescendingTriangle => (
            PatternSignal::SellBreakdown,
            Some(lower_now - height),
            Some(upper_now),
        ),
        _ => (PatternSignal::WatchBreakout, None, None),
    };

    Some(
        PatternMatch::new(
            kind,
            (upper.r_squared + lower.r_squared) / 2.0,
            start_index,
            end_index,
            format!(
                "{}: resistance {upper_now:.2}, support {lower_now:.2}, apex in {horizon:.0} bars",
                kind.label()
            ),
        )
        .with_signal(signal)
        .with_targets(target, stop),
    )
}
