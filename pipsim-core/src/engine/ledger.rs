//! Statistics ledger and closed-trade history. Both are append-only.

use serde::{Deserialize, Serialize};

use crate::domain::{ClosedTradeRecord, Direction, TradeClass};

/// Realized pips per classification tag, in close order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticsLedger {
    trend: Vec<f64>,
    fade: Vec<f64>,
}

impl StatisticsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sequences(trend: Vec<f64>, fade: Vec<f64>) -> Self {
        Self { trend, fade }
    }

    pub fn record_trade(&mut self, classification: TradeClass, pips: f64) {
        match classification {
            TradeClass::Trend => self.trend.push(pips),
            TradeClass::Fade => self.fade.push(pips),
        }
    }

    pub fn pips(&self, classification: TradeClass) -> &[f64] {
        match classification {
            TradeClass::Trend => &self.trend,
            TradeClass::Fade => &self.fade,
        }
    }

    pub fn total_trades(&self) -> usize {
        self.trend.len() + self.fade.len()
    }

    pub fn summary(&self, classification: TradeClass) -> TradeSummary {
        TradeSummary::from_pips(self.pips(classification))
    }
}

/// Summary of one classification's realized pips, computed on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub count: usize,
    pub wins: usize,
    pub losses: usize,
    pub total_pips: f64,
    pub mean_pips: f64,
    pub win_rate: f64,
    pub best_pips: f64,
    pub worst_pips: f64,
}

impl TradeSummary {
    pub fn from_pips(pips: &[f64]) -> Self {
        if pips.is_empty() {
            return Self::default();
        }
        let count = pips.len();
        let wins = pips.iter().filter(|&&p| p > 0.0).count();
        let losses = pips.iter().filter(|&&p| p < 0.0).count();
        let total_pips: f64 = pips.iter().sum();
        Self {
            count,
            wins,
            losses,
            total_pips,
            mean_pips: total_pips / count as f64,
            win_rate: wins as f64 / count as f64,
            best_pips: pips.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            worst_pips: pips.iter().copied().fold(f64::INFINITY, f64::min),
        }
    }
}

/// Closed trades in the order they were closed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeHistory {
    records: Vec<ClosedTradeRecord>,
}

impl TradeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ClosedTradeRecord>) -> Self {
        Self { records }
    }

    pub fn append_history(
        &mut self,
        open_index: usize,
        open_price: f64,
        close_index: usize,
        close_price: f64,
        direction: Direction,
    ) -> ClosedTradeRecord {
        let record = ClosedTradeRecord {
            open_index,
            open_price,
            close_index,
            close_price,
            direction,
        };
        self.records.push(record);
        record
    }

    pub fn records(&self) -> &[ClosedTradeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records closed within `start..=end`, in insertion order.
    pub fn trades_in_view(
        &self,
        start: usize,
        end: usize,
    ) -> impl Iterator<Item = &ClosedTradeRecord> + '_ {
        self.records
            .iter()
            .filter(move |r| r.close_index >= start && r.close_index <= end)
    }
}
