//! Domain types for PipSim

pub mod account;
pub mod bar;
pub mod position;
pub mod trade;

pub use account::Account;
pub use bar::Bar;
pub use position::{Position, PositionMode, TradeClass};
pub use trade::{ClosedTradeRecord, Direction};
