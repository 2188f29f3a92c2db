//! Deterministic synthetic bar series for demos, tests and benchmarks.
//!
//! All series start on 2024-01-02 UTC with one bar per day.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::Bar;

// 2024-01-02T00:00:00Z
const START_SECS: i64 = 1_704_153_600;

fn timestamp(i: usize) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(START_SECS, 0).unwrap_or_default() + Duration::days(i as i64)
}

/// Seeded random walk with up to ±2% daily moves and wicks.
///
/// The same `(n, seed)` always yields the same bars.
pub fn random_walk(n: usize, seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut close = 100.0_f64;
    (0..n)
        .map(|i| {
            let open = close;
            close = (open * (1.0 + rng.gen_range(-0.02..0.02))).max(1.0);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(1_000.0..10_000.0_f64).round();
            Bar::new(timestamp(i), open, high, low, close, volume)
        })
        .collect()
}

/// Closes compounding by `pct` per bar, no wicks, constant volume.
pub fn geometric_ramp(start_price: f64, pct: f64, n: usize) -> Vec<Bar> {
    let mut prev = start_price;
    (0..n)
        .map(|i| {
            let close = start_price * (1.0 + pct).powi(i as i32);
            let open = if i == 0 { close } else { prev };
            prev = close;
            Bar::new(
                timestamp(i),
                open,
                open.max(close),
                open.min(close),
                close,
                1_000.0,
            )
        })
        .collect()
}

/// Every price equal, zero volume.
pub fn flat(price: f64, n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| Bar::new(timestamp(i), price, price, price, price, 0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validate_bars;

    #[test]
    fn random_walk_is_deterministic_and_sane() {
        let a = random_walk(200, 42);
        assert_eq!(a, random_walk(200, 42));
        assert_ne!(a, random_walk(200, 43));
        assert!(a.iter().all(Bar::is_sane));
        assert!(validate_bars(&a).is_ok());
    }

    #[test]
    fn ramp_shape() {
        let bars = geometric_ramp(100.0, 0.01, 5);
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[1].open, bars[0].close);
        assert_eq!(bars[4].high, bars[4].close);
        assert!(bars.iter().all(|b| b.volume == 1_000.0 && b.is_sane()));
    }

    #[test]
    fn flat_has_no_range() {
        let bars = flat(10.0, 3);
        assert!(bars.iter().all(|b| b.range() == 0.0 && b.volume == 0.0));
        assert!(validate_bars(&bars).is_ok());
    }
}
