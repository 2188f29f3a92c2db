//! Support and resistance levels.
//!
//! Highs, lows and every `close_stride`-th close are sorted and greedily
//! clustered: a price joins the open cluster while it stays within
//! `tolerance` of the cluster mean. Clusters with at least `min_touches`
//! members become levels. Each bar is then checked against the level's
//! zone for bounces (support) and rejections (resistance).

use std::cmp::Ordering;

use super::{LevelKind, PriceLevel};
use crate::config::LevelConfig;
use crate::domain::Bar;

pub fn detect(bars: &[Bar], config: &LevelConfig) -> Vec<PriceLevel> {
    let Some(current) = bars.last() else {
        return Vec::new();
    };
    let stride = config.close_stride.max(1);

    let mut prices: Vec<f64> = bars
        .iter()
        .flat_map(|b| [b.high, b.low])
        .chain(bars.iter().step_by(stride).map(|b| b.close))
        .filter(|p| p.is_finite())
        .collect();
    prices.sort_by(f64::total_cmp);

    let mut levels: Vec<PriceLevel> = cluster(&prices, config.tolerance)
        .into_iter()
        .filter(|c| c.count >= config.min_touches)
        .map(|c| classify(bars, c.mean(), c.count, current.close, config))
        .collect();
    levels.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal));
    levels
}

struct Cluster {
    sum: f64,
    count: usize,
}

impl Cluster {
    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

fn within(price: f64, center: f64, tolerance: f64) -> bool {
    (price - center).abs() <= tolerance * center.abs()
}

fn cluster(sorted: &[f64], tolerance: f64) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();
    for &p in sorted {
        match clusters.last_mut() {
            Some(c) if within(p, c.mean(), tolerance) => {
                c.sum += p;
                c.count += 1;
            }
            _ => clusters.push(Cluster { sum: p, count: 1 }),
        }
    }
    clusters
}

fn classify(
    bars: &[Bar],
    price: f64,
    touches: usize,
    current_close: f64,
    config: &LevelConfig,
) -> PriceLevel {
    let zone_low = price - price.abs() * config.tolerance;
    let zone_high = price + price.abs() * config.tolerance;
    let in_zone = |p: f64| p >= zone_low && p <= zone_high;

    let mut support_touches = 0;
    let mut resistance_touches = 0;
    for w in bars.windows(2) {
        let (prev, bar) = (&w[0], &w[1]);
        // Bounce: dips into the zone, closes up, after a down bar.
        if in_zone(bar.low) && bar.is_bullish() && prev.is_bearish() {
            support_touches += 1;
        }
        // Rejection: pokes into the zone, closes down, after an up bar.
        if in_zone(bar.high) && bar.is_bearish() && prev.is_bullish() {
            resistance_touches += 1;
        }
    }

    let kind = match (support_touches > 0, resistance_touches > 0) {
        (true, true) => LevelKind::Pivot,
        (true, false) => LevelKind::Support,
        (false, true) => LevelKind::Resistance,
        (false, false) if price < current_close => LevelKind::Support,
        (false, false) => LevelKind::Resistance,
    };

    let multiplier = if kind == LevelKind::Pivot {
        config.dual_role_multiplier
    } else {
        1.0
    };
    PriceLevel {
        price,
        kind,
        touches,
        support_touches,
        resistance_touches,
        strength: (touches as f64 * multiplier).min(config.max_strength),
    }
}
