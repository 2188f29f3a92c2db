//! CSV bar files.
//!
//! Header `timestamp,open,high,low,close,volume`; timestamps are RFC 3339.
//! Rows must already be in ascending time order.

use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::domain::{validate_bars, Bar, BarError};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid bar series: {0}")]
    InvalidBars(#[from] BarError),

    #[error("no bars in input")]
    Empty,
}

/// Parse and validate bars from any CSV source.
pub fn read_bars_csv<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut rdr = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(::csv::Trim::All)
        .from_reader(reader);
    let bars = rdr
        .deserialize::<Bar>()
        .collect::<Result<Vec<_>, _>>()?;
    if bars.is_empty() {
        return Err(DataError::Empty);
    }
    validate_bars(&bars)?;
    Ok(bars)
}

pub fn load_bars_csv(path: impl AsRef<Path>) -> Result<Vec<Bar>, DataError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let bars = read_bars_csv(file)?;
    tracing::info!(path = %path.display(), bars = bars.len(), "loaded bars");
    Ok(bars)
}

pub fn write_bars_csv<W: Write>(writer: W, bars: &[Bar]) -> Result<(), DataError> {
    let mut wtr = ::csv::Writer::from_writer(writer);
    for bar in bars {
        wtr.serialize(bar)?;
    }
    wtr.flush()?;
    Ok(())
}
