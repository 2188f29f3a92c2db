//! Deterministic fingerprint of one analysis input.
//!
//! Two calls with an identical configuration and an identical bar window
//! produce the same digest, so the digest can key a result cache or tag a
//! saved report.

use crate::config::{AnalysisConfig, BackendKind};
use crate::domain::Bar;

/// BLAKE3 hex digest over the JSON form of `config` followed by every bar.
///
/// The backend is left out: both backends produce identical results. Bars are hashed field by field in little-endian form so the digest does
/// not depend on float formatting.
pub fn analysis_fingerprint(
    config: &AnalysisConfig,
    bars: &[Bar],
) -> Result<String, serde_json::Error> {
    let canonical = AnalysisConfig {
        backend: BackendKind::default(),
        ..config.clone()
    };
    let mut hasher = blake3::Hasher::new();
    hasher.update(&serde_json::to_vec(&canonical)?);
    hasher.update(&(bars.len() as u64).to_le_bytes());
    for bar in bars {
        hasher.update(bar.timestamp.to_rfc3339().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    Ok(hasher.finalize().to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::random_walk;

    #[test]
    fn stable_for_same_input() {
        let bars = random_walk(60, 5);
        let config = AnalysisConfig::default();
        let a = analysis_fingerprint(&config, &bars).unwrap();
        let b = analysis_fingerprint(&config.clone(), &bars.clone()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn changes_with_config() {
        let bars = random_walk(60, 5);
        let mut config = AnalysisConfig::default();
        let before = analysis_fingerprint(&config, &bars).unwrap();
        config.indicators.rsi.period = 21;
        assert_ne!(analysis_fingerprint(&config, &bars).unwrap(), before);
    }

    #[test]
    fn changes_with_one_bar() {
        let mut bars = random_walk(60, 5);
        let config = AnalysisConfig::default();
        let before = analysis_fingerprint(&config, &bars).unwrap();
        bars[30].volume += 1.0;
        assert_ne!(analysis_fingerprint(&config, &bars).unwrap(), before);
    }

    #[test]
    fn backend_choice_does_not_change_digest() {
        let bars = random_walk(10, 1);
        let seq = AnalysisConfig::default();
        let par = AnalysisConfig {
            backend: BackendKind::Parallel { threads: 2 },
            ..AnalysisConfig::default()
        };
        assert_eq!(
            analysis_fingerprint(&seq, &bars).unwrap(),
            analysis_fingerprint(&par, &bars).unwrap()
        );
    }
}
