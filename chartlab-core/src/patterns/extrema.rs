//! Local peak and trough finder.
//!
//! Index `i` is a peak when no value within `±min_distance` exceeds it and
//! its relative prominence clears `min_prominence`. Prominence compares the
//! value with the higher of the lowest points to its left and right within
//! `±prominence_window`. Only indices with a complete `±min_distance`
//! neighbourhood qualify, so the last `min_distance` bars are never extrema.
//! On a plateau only the first index counts.

use serde::{Deserialize, Serialize};

use crate::config::ExtremaConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    pub index: usize,
    pub price: f64,
    /// Relative prominence, e.g. 0.05 = 5%.
    pub prominence: f64,
}

/// Peaks of `values` (typically bar highs), in index order.
pub fn find_peaks(values: &[f64], config: &ExtremaConfig) -> Vec<Extremum> {
    find(values, config, Side::Peak)
}

/// Troughs of `values` (typically bar lows), in index order.
pub fn find_troughs(values: &[f64], config: &ExtremaConfig) -> Vec<Extremum> {
    find(values, config, Side::Trough)
}

#[derive(Clone, Copy)]
enum Side {
    Peak,
    Trough,
}

fn find(values: &[f64], config: &ExtremaConfig, side: Side) -> Vec<Extremum> {
    let n = values.len();
    let d = config.min_distance;
    if d == 0 || n < 2 * d + 1 {
        return Vec::new();
    }

    // `beats(a, b)`: a is strictly more extreme than b in this direction.
    let beats = |a: f64, b: f64| match side {
        Side::Peak => a > b,
        Side::Trough => a < b,
    };

    let mut found = Vec::new();
    for i in d..n - d {
        let v = values[i];
        if !v.is_finite() {
            continue;
        }
        let left_ok = values[i - d..i].iter().all(|&x| beats(v, x));
        let right_ok = values[i + 1..=i + d].iter().all(|&x| !beats(x, v));
        if !(left_ok && right_ok) {
            continue;
        }

        let prominence = prominence(values, i, config.prominence_window, side);
        if prominence > config.min_prominence {
            found.push(Extremum {
                index: i,
                price: v,
                prominence,
            });
        }
    }
    found
}

fn prominence(values: &[f64], i: usize, window: usize, side: Side) -> f64 {
    let v = values[i];
    if v == 0.0 {
        return 0.0;
    }
    let left = &values[i.saturating_sub(window)..i];
    let right = &values[i + 1..(i + window + 1).min(values.len())];

    let reference = match side {
        Side::Peak => {
            let left_min = left.iter().copied().fold(f64::INFINITY, f64::min);
            let right_min = right.iter().copied().fold(f64::INFINITY, f64::min);
            left_min.max(right_min)
        }
        Side::Trough => {
            let left_max = left.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let right_max = right.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            left_max.min(right_max)
        }
    };
    let diff = match side {
        Side::Peak => v - reference,
        Side::Trough => reference - v,
    };
    let p = diff / v.abs();
    if p.is_finite() {
        p
    } else {
        0.0
    }
}
