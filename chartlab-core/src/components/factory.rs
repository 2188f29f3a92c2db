//! Factory system: turns a tagged `StrategyConfig` into a runtime strategy.
//!
//! The config is a closed enum so an unknown `type` tag fails at parse time.
//! `default_for` resolves a bare name (e.g. from the CLI) into the default
//! parameters of that strategy.

use serde::{Deserialize, Serialize};

use super::strategy::{
    BollingerReversion, BollingerReversionParams, Composite, CompositeParams, LinearRegression,
    LinearRegressionParams, MaCrossover, MaCrossoverParams, MomentumParams, MomentumStrategy,
    RsiReversion, RsiReversionParams, Strategy, VolatilityBreakout, VolatilityBreakoutParams,
    ZScore, ZScoreParams,
};
use crate::error::AnalysisError;

// ─── Error type ──────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("Unknown strategy type: {0}")]
    UnknownStrategy(String),
}

// ─── Config ──────────────────────────────────────────────────────────

/// One strategy and its parameters.
///
/// ```toml
/// type = "Z_SCORE"
/// period = 30
/// entry = 2.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyConfig {
    LinearRegression(LinearRegressionParams),
    ZScore(ZScoreParams),
    VolatilityBreakout(VolatilityBreakoutParams),
    MaCrossover(MaCrossoverParams),
    RsiReversion(RsiReversionParams),
    Momentum(MomentumParams),
    BollingerReversion(BollingerReversionParams),
    Composite(CompositeParams),
}

const NAMES: [&str; 8] = [
    "linear_regression",
    "z_score",
    "volatility_breakout",
    "ma_crossover",
    "rsi_reversion",
    "momentum",
    "bollinger_reversion",
    "composite",
];

impl StrategyConfig {
    /// Default parameters for the strategy called `name`.
    pub fn default_for(name: &str) -> Result<Self, FactoryError> {
        let config = match name {
            "linear_regression" => Self::LinearRegression(Default::default()),
            "z_score" => Self::ZScore(Default::default()),
            "volatility_breakout" => Self::VolatilityBreakout(Default::default()),
            "ma_crossover" => Self::MaCrossover(Default::default()),
            "rsi_reversion" => Self::RsiReversion(Default::default()),
            "momentum" => Self::Momentum(Default::default()),
            "bollinger_reversion" => Self::BollingerReversion(Default::default()),
            "composite" => Self::Composite(Default::default()),
            other => return Err(FactoryError::UnknownStrategy(other.to_string())),
        };
        Ok(config)
    }

    /// Snake-case name, identical to the built strategy's `name()`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LinearRegression(_) => "linear_regression",
            Self::ZScore(_) => "z_score",
            Self::VolatilityBreakout(_) => "volatility_breakout",
            Self::MaCrossover(_) => "ma_crossover",
            Self::RsiReversion(_) => "rsi_reversion",
            Self::Momentum(_) => "momentum",
            Self::BollingerReversion(_) => "bollinger_reversion",
            Self::Composite(_) => "composite",
        }
    }

    pub fn names() -> &'static [&'static str] {
        &NAMES
    }
}

/// Validate parameters and build the strategy.
pub fn build_strategy(config: &StrategyConfig) -> Result<Box<dyn Strategy>, AnalysisError> {
    let strategy: Box<dyn Strategy> = match config {
        StrategyConfig::LinearRegression(p) => Box::new(LinearRegression::new(*p)?),
        StrategyConfig::ZScore(p) => Box::new(ZScore::new(*p)?),
        StrategyConfig::VolatilityBreakout(p) => Box::new(VolatilityBreakout::new(*p)?),
        StrategyConfig::MaCrossover(p) => Box::new(MaCrossover::new(*p)?),
        StrategyConfig::RsiReversion(p) => Box::new(RsiReversion::new(*p)?),
        StrategyConfig::Momentum(p) => Box::new(MomentumStrategy::new(*p)?),
        StrategyConfig::BollingerReversion(p) => Box::new(BollingerReversion::new(*p)?),
        StrategyConfig::Composite(p) => Box::new(Composite::new(p.clone())?),
    };
    tracing::debug!(
        strategy = strategy.name(),
        warmup = strategy.warmup_bars(),
        "strategy built"
    );
    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_builds_with_defaults() {
        for name in StrategyConfig::names() {
            let config = StrategyConfig::default_for(name).unwrap();
            assert_eq!(config.name(), *name);
            let strategy = build_strategy(&config).unwrap();
            assert_eq!(strategy.name(), *name);
            assert!(strategy.warmup_bars() > 0);
        }
    }

    #[test]
    fn unknown_name_rejected() {
        let err = StrategyConfig::default_for("turtle").unwrap_err();
        assert!(matches!(err, FactoryError::UnknownStrategy(ref n) if n == "turtle"));
        assert_eq!(err.to_string(), "Unknown strategy type: turtle");
    }

    #[test]
    fn tagged_toml_with_partial_params() {
        let config: StrategyConfig = toml::from_str(
            r#"
            type = "Z_SCORE"
            period = 30
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            StrategyConfig::ZScore(ZScoreParams {
                period: 30,
                ..ZScoreParams::default()
            })
        );
    }

    #[test]
    fn unknown_tag_fails_to_parse() {
        let result: Result<StrategyConfig, _> = toml::from_str(r#"type = "TURTLE""#);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_params_surface_at_build() {
        let config = StrategyConfig::MaCrossover(MaCrossoverParams { fast: 30, slow: 10 });
        assert!(matches!(
            build_strategy(&config),
            Err(AnalysisError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn json_roundtrip_keeps_tag() {
        let config = StrategyConfig::default_for("momentum").unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""type":"MOMENTUM""#));
        let back: StrategyConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
