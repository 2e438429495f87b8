//! PipSim CLI — read-only reports over the settings and data directories.

pub mod report;

pub use report::{DataReport, HistoryReport, StatsReport};
