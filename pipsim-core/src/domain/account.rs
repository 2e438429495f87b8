//! Account — realized equity plus the running profit of the open position.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Balance before the open trade. Changes only when a position closes.
    pub equity: f64,
    /// Mirrors the open position's unrealized profit; zero when flat.
    pub running_profit: f64,
}

impl Account {
    pub fn new(equity: f64) -> Self {
        Self {
            equity,
            running_profit: 0.0,
        }
    }

    /// Equity marked to the current bar.
    pub fn marked_equity(&self) -> f64 {
        self.equity + self.running_profit
    }
}
