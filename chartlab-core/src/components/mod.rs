//! Component traits and their implementations.
//!
//! - `Indicator`: bar window in, named numeric series out
//! - `Strategy`: bar window in, one typed `Signal` out
//!
//! Strategies are selected from a tagged `StrategyConfig` by the factory.

pub mod factory;
pub mod indicator;
pub mod strategy;

pub use factory::{build_strategy, FactoryError, StrategyConfig};
pub use indicator::{Indicator, IndicatorValues};
pub use strategy::{run_strategy, Strategy};
