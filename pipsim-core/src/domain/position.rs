//! Position — the single simulated position and its classification tag.

use serde::{Deserialize, Serialize};

use super::trade::Direction;

/// State of the one position the simulator can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionMode {
    #[default]
    Closed,
    Long,
    Short,
}

impl PositionMode {
    pub fn label(self) -> &'static str {
        match self {
            PositionMode::Closed => "CLOSED",
            PositionMode::Long => "BUY",
            PositionMode::Short => "SELL",
        }
    }
}

/// How the user tagged a trade when opening it. Realized pips are
/// accumulated separately per tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TradeClass {
    #[default]
    Trend,
    Fade,
}

impl TradeClass {
    pub const ALL: [TradeClass; 2] = [TradeClass::Trend, TradeClass::Fade];

    pub fn label(self) -> &'static str {
        match self {
            TradeClass::Trend => "Trend",
            TradeClass::Fade => "Fade",
        }
    }
}

/// The active position.
///
/// Invariant: `mode == Closed` exactly when entry, stop, size and pips are all
/// zero. [`Position::closed`] is the only closed shape.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub mode: PositionMode,
    pub entry_price: f64,
    pub stop_loss_price: f64,
    pub size: f64,
    pub unrealized_pips: f64,
    pub unrealized_profit: f64,
    pub opened_at_index: usize,
    pub classification: TradeClass,
}

impl Position {
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.mode != PositionMode::Closed
    }

    /// Direction of the open position, `None` when closed.
    pub fn direction(&self) -> Option<Direction> {
        match self.mode {
            PositionMode::Closed => None,
            PositionMode::Long => Some(Direction::Long),
            PositionMode::Short => Some(Direction::Short),
        }
    }

    /// True when the fields agree with the mode (see the type-level invariant).
    pub fn is_consistent(&self) -> bool {
        let zeroed = self.entry_price == 0.0
            && self.size == 0.0
            && self.stop_loss_price == 0.0
            && self.unrealized_pips == 0.0;
        (self.mode == PositionMode::Closed) == zeroed
    }
}
