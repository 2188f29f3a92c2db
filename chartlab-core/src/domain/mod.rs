//! Domain types for ChartLab

pub mod bar;
pub mod signal;

pub use bar::{closes, highs, lows, validate_bars, volumes, Bar, BarError};
pub use signal::{Signal, SignalType};
