//! ClosedTradeRecord — one finished round trip, as drawn on the chart.

use serde::{Deserialize, Serialize};

/// Side of a closed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Numeric code used in the history file.
    pub fn code(self) -> u8 {
        match self {
            Direction::Long => 1,
            Direction::Short => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Direction::Long),
            2 => Some(Direction::Short),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }
}

/// Entry and exit of a closed trade, by bar index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosedTradeRecord {
    pub open_index: usize,
    pub open_price: f64,
    pub close_index: usize,
    pub close_price: f64,
    pub direction: Direction,
}

impl ClosedTradeRecord {
    /// Raw price move in the trade's favour (no spread offset).
    pub fn price_move(&self) -> f64 {
        match self.direction {
            Direction::Long => self.close_price - self.open_price,
            Direction::Short => self.open_price - self.close_price,
        }
    }

    pub fn bars_held(&self) -> usize {
        self.close_index.saturating_sub(self.open_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_codes_roundtrip() {
        for dir in [Direction::Long, Direction::Short] {
            assert_eq!(Direction::from_code(dir.code()), Some(dir));
        }
        assert_eq!(Direction::from_code(0), None);
        assert_eq!(Direction::from_code(3), None);
    }

    #[test]
    fn price_move_by_direction() {
        let long = ClosedTradeRecord {
            open_index: 10,
            open_price: 1.2000,
            close_index: 14,
            close_price: 1.2050,
            direction: Direction::Long,
        };
        assert!((long.price_move() - 0.0050).abs() < 1e-12);
        assert_eq!(long.bars_held(), 4);

        let short = ClosedTradeRecord {
            direction: Direction::Short,
            ..long
        };
        assert!((short.price_move() + 0.0050).abs() < 1e-12);
    }
}
