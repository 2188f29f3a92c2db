//! Bar input and output: CSV files and deterministic synthetic series.

pub mod csv;
pub mod synthetic;

pub use self::csv::{load_bars_csv, read_bars_csv, write_bars_csv, DataError};
pub use synthetic::{flat, geometric_ramp, random_walk};
