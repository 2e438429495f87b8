//! Bar data discovery, loading and indexed lookup.

pub mod bar_store;
pub mod loader;
pub mod source;

use std::path::PathBuf;

pub use bar_store::{BarStore, IndexOutOfRange, Side};
pub use loader::{load_bars, load_store, parse_bars};
pub use source::{SourceFiles, Timeframe};

/// Failure to produce a usable bar series at startup. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("no hourly data file found in {dir}")]
    NoSourceFile { dir: PathBuf },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV records from {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no parseable bars in {path}")]
    Empty { path: PathBuf },

    #[error("bar series is empty")]
    EmptySeries,

    #[error("ask series has {ask} bars but bid series has {bid}")]
    LengthMismatch { ask: usize, bid: usize },
}
