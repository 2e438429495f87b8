//! Position engine — one position, fixed-risk sizing, stop-loss, ledger.
//!
//! Per frame the UI calls [`EngineState::tick`] with the rightmost visible bar:
//!
//! 1. Mark the open position against that bar (pips, profit)
//! 2. Force a close at the stop price if the bar breached it
//!
//! User actions call the open/close mutators directly. Invalid transitions
//! (opening while open, closing while flat) are silent no-ops.

pub mod ledger;
pub mod policy;
pub mod state;

pub use ledger::{StatisticsLedger, TradeHistory, TradeSummary};
pub use policy::RiskPolicy;
pub use state::EngineState;
