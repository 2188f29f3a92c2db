//! Property tests for indicator invariants.
//!
//! Uses proptest to verify, for arbitrary finite price series:
//! 1. Output lengths follow the suffix-alignment rule
//! 2. Bounded oscillators stay inside their range
//! 3. Averages stay inside the window they average
//! 4. No NaN or infinity ever leaves an indicator

use chartlab_core::indicators::{
    atr, bollinger_bands, cci, ema, macd, momentum, obv, roc, rsi, sma, stochastic, vwap,
    williams_r, wma,
};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1_000.0_f64, 30..120)
}

/// (highs, lows, closes, volumes) with low <= close <= high.
fn arb_ohlcv() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>)> {
    prop::collection::vec((1.0..1_000.0_f64, 0.0..20.0_f64, 0.0..20.0_f64, 0.0..1e6_f64), 30..120)
        .prop_map(|rows| {
            let closes: Vec<f64> = rows.iter().map(|r| r.0).collect();
            let highs = rows.iter().map(|r| r.0 + r.1).collect();
            let lows = rows.iter().map(|r| (r.0 - r.2).max(0.5)).collect();
            let volumes = rows.iter().map(|r| r.3).collect();
            (highs, lows, closes, volumes)
        })
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

// ── 1. Lengths ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn moving_average_lengths(closes in arb_closes(), period in 1usize..30) {
        let n = closes.len();
        prop_assert_eq!(sma(&closes, period).unwrap().len(), n - period + 1);
        prop_assert_eq!(ema(&closes, period).unwrap().len(), n - period + 1);
        prop_assert_eq!(wma(&closes, period).unwrap().len(), n - period + 1);
        prop_assert_eq!(rsi(&closes, period).unwrap().len(), n - period);
        prop_assert_eq!(momentum(&closes, period).unwrap().len(), n - period);
    }

    #[test]
    fn too_short_input_is_insufficient_data(closes in arb_closes()) {
        let period = closes.len() + 1;
        prop_assert!(sma(&closes, period).unwrap_err().is_insufficient_data());
        prop_assert!(rsi(&closes, closes.len()).unwrap_err().is_insufficient_data());
    }
}

// ── 2. Bounded oscillators ───────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_bounded(closes in arb_closes(), period in 2usize..25) {
        for v in rsi(&closes, period).unwrap() {
            prop_assert!((0.0..=100.0).contains(&v), "rsi out of range: {}", v);
        }
    }

    #[test]
    fn stochastic_and_williams_bounded((h, l, c, _v) in arb_ohlcv(), k in 2usize..20, d in 1usize..5) {
        let out = stochastic(&h, &l, &c, k, d).unwrap();
        prop_assert_eq!(out.k.len(), c.len() - k + 1);
        prop_assert_eq!(out.d.len(), out.k.len() - d + 1);
        for v in out.k.iter().chain(&out.d) {
            prop_assert!(*v >= -1e-9 && *v <= 100.0 + 1e-9);
        }
        for v in williams_r(&h, &l, &c, k).unwrap() {
            prop_assert!((-100.0..=0.0).contains(&v));
        }
    }
}

// ── 3. Averages inside their window ──────────────────────────────────

proptest! {
    #[test]
    fn sma_within_window_extremes(closes in arb_closes(), period in 1usize..30) {
        let out = sma(&closes, period).unwrap();
        for (i, v) in out.iter().enumerate() {
            let window = &closes[i..i + period];
            let lo = window.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(*v >= lo - 1e-9 && *v <= hi + 1e-9);
        }
    }

    #[test]
    fn bollinger_bands_ordered(closes in arb_closes(), period in 2usize..25, k in 0.0..4.0_f64) {
        let bands = bollinger_bands(&closes, period, k).unwrap();
        for i in 0..bands.middle.len() {
            prop_assert!(bands.upper[i] >= bands.middle[i]);
            prop_assert!(bands.middle[i] >= bands.lower[i]);
        }
    }

    #[test]
    fn atr_non_negative((h, l, c, _v) in arb_ohlcv(), period in 1usize..20) {
        let out = atr(&h, &l, &c, period).unwrap();
        prop_assert_eq!(out.len(), c.len() - period);
        prop_assert!(out.iter().all(|v| *v >= 0.0));
    }
}

// ── 4. Finite outputs ────────────────────────────────────────────────

proptest! {
    #[test]
    fn every_indicator_is_finite((h, l, c, v) in arb_ohlcv()) {
        prop_assert!(all_finite(&cci(&h, &l, &c, 20).unwrap()));
        prop_assert!(all_finite(&roc(&c, 10).unwrap()));
        prop_assert!(all_finite(&vwap(&h, &l, &c, &v).unwrap()));
        prop_assert!(all_finite(&obv(&c, &v).unwrap()));
        let m = macd(&c, 5, 10, 4).unwrap();
        prop_assert!(all_finite(&m.macd) && all_finite(&m.signal) && all_finite(&m.histogram));
    }
}
