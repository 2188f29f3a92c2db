//! The full analysis engine behind the `Strategy` interface.
//!
//! Indicators, patterns and scoring all vote; the scored signal for the last
//! bar is the strategy's answer.

use serde::{Deserialize, Serialize};

use super::Strategy;
use crate::config::AnalysisConfig;
use crate::domain::{Bar, Signal};
use crate::engine::AnalysisEngine;
use crate::error::AnalysisError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeParams {
    pub analysis: AnalysisConfig,
}

#[derive(Debug)]
pub struct Composite {
    engine: AnalysisEngine,
}

impl Composite {
    pub fn new(params: CompositeParams) -> Result<Self, AnalysisError> {
        Ok(Self {
            engine: AnalysisEngine::new(params.analysis)?,
        })
    }

    pub fn engine(&self) -> &AnalysisEngine {
        &self.engine
    }
}

impl Strategy for Composite {
    fn name(&self) -> &str {
        "composite"
    }

    fn warmup_bars(&self) -> usize {
        self.engine.required_bars()
    }

    fn compute_signal(&self, bars: &[Bar]) -> Result<Signal, AnalysisError> {
        self.engine.analyze(bars)?.to_signal(bars)
    }
}
