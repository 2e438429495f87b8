//! PipSim Core — bar store, position engine, trade ledger, persistence.
//!
//! This crate holds everything the chart replays and the user trades against:
//! - Domain types (bars, positions, accounts, closed-trade records)
//! - Bar data discovery and loading (ask/bid series)
//! - Single-position state machine with fixed-risk sizing and stop-loss
//! - Per-classification pip statistics and the closed-trade ledger
//! - Line-oriented persistence of account, viewport, statistics and history
//! - Viewport navigation and the session controller the UI drives

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod persistence;
pub mod session;
pub mod viewport;

pub use config::{ConfigError, SimConfig};
pub use data::{BarStore, DataLoadError, IndexOutOfRange};
pub use engine::{EngineState, RiskPolicy, StatisticsLedger, TradeHistory, TradeSummary};
pub use persistence::{PersistedState, PersistenceError};
pub use session::{Action, Outcome, Session};
pub use viewport::{Viewport, ZoomLevel};
