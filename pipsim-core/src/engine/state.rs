//! EngineState — the position state machine, account and ledgers.

use tracing::{debug, info};

use crate::data::{BarStore, IndexOutOfRange};
use crate::domain::{Account, ClosedTradeRecord, Direction, Position, PositionMode, TradeClass};

use super::ledger::{StatisticsLedger, TradeHistory};
use super::policy::RiskPolicy;

/// Everything the engine owns. One instance per session, mutated only from
/// the frame loop.
///
/// Every transition reads the bars it needs before touching any field, so an
/// `IndexOutOfRange` leaves the state exactly as it was.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub position: Position,
    pub account: Account,
    pub stats: StatisticsLedger,
    pub history: TradeHistory,
    pub policy: RiskPolicy,
}

impl EngineState {
    pub fn new(equity: f64) -> Self {
        Self::with_ledgers(equity, StatisticsLedger::new(), TradeHistory::new())
    }

    pub fn with_ledgers(equity: f64, stats: StatisticsLedger, history: TradeHistory) -> Self {
        Self {
            position: Position::closed(),
            account: Account::new(equity),
            stats,
            history,
            policy: RiskPolicy::STANDARD,
        }
    }

    /// Open a long at the ask close of `index`. Returns false (and changes
    /// nothing) when a position is already open.
    pub fn open_long(
        &mut self,
        bars: &BarStore,
        index: usize,
        classification: TradeClass,
    ) -> Result<bool, IndexOutOfRange> {
        if self.position.is_open() {
            debug!(mode = ?self.position.mode, "open long ignored: position already open");
            return Ok(false);
        }
        let entry = bars.ask_at(index)?.close;
        let stop = entry - self.policy.stop_distance();
        self.open(PositionMode::Long, entry, stop, index, classification);
        Ok(true)
    }

    /// Open a short at the bid close of `index`. No-op when already open.
    pub fn open_short(
        &mut self,
        bars: &BarStore,
        index: usize,
        classification: TradeClass,
    ) -> Result<bool, IndexOutOfRange> {
        if self.position.is_open() {
            debug!(mode = ?self.position.mode, "open short ignored: position already open");
            return Ok(false);
        }
        let entry = bars.bid_at(index)?.close;
        let stop = entry + self.policy.stop_distance();
        self.open(PositionMode::Short, entry, stop, index, classification);
        Ok(true)
    }

    fn open(
        &mut self,
        mode: PositionMode,
        entry: f64,
        stop: f64,
        index: usize,
        classification: TradeClass,
    ) {
        let size = self.policy.position_size(self.account.equity);
        self.position = Position {
            mode,
            entry_price: entry,
            stop_loss_price: stop,
            size,
            unrealized_pips: 0.0,
            unrealized_profit: 0.0,
            opened_at_index: index,
            classification,
        };
        self.account.running_profit = 0.0;
        info!(
            mode = mode.label(),
            class = classification.label(),
            index,
            entry,
            stop,
            size,
            "position opened"
        );
    }

    /// Mark the open position against bar `index` and enforce the stop.
    ///
    /// Returns the closed trade when the bar breached the stop; the fill is
    /// the stop price itself, whatever the bar did.
    pub fn tick(
        &mut self,
        bars: &BarStore,
        index: usize,
    ) -> Result<Option<ClosedTradeRecord>, IndexOutOfRange> {
        if !self.position.is_open() {
            return Ok(None);
        }
        let ask = *bars.ask_at(index)?;
        let bid = *bars.bid_at(index)?;

        let stop = self.position.stop_loss_price;
        let (direction, pips, breached) = match self.position.mode {
            PositionMode::Long => (Direction::Long, self.long_pips(bid.close), bid.low <= stop),
            PositionMode::Short => (Direction::Short, self.short_pips(ask.close), ask.high >= stop),
            PositionMode::Closed => return Ok(None),
        };
        self.mark(pips);

        if breached {
            info!(index, stop, "stop loss hit");
            return Ok(Some(self.realize(direction, index, stop)));
        }
        Ok(None)
    }

    /// Close the open position at bar `index`.
    ///
    /// Without an override a long closes at the bid close and a short at the
    /// ask close, and the position is re-marked there first so the realized
    /// pips match the fill. With an override the current marks are realized
    /// as they stand. No-op when flat.
    pub fn close(
        &mut self,
        bars: &BarStore,
        index: usize,
        close_price_override: Option<f64>,
    ) -> Result<Option<ClosedTradeRecord>, IndexOutOfRange> {
        let Some(direction) = self.position.direction() else {
            debug!("close ignored: no open position");
            return Ok(None);
        };
        let close_price = match close_price_override {
            Some(price) => price,
            None => {
                let (price, pips) = match direction {
                    Direction::Long => {
                        let price = bars.bid_at(index)?.close;
                        (price, self.long_pips(price))
                    }
                    Direction::Short => {
                        let price = bars.ask_at(index)?.close;
                        (price, self.short_pips(price))
                    }
                };
                self.mark(pips);
                price
            }
        };
        Ok(Some(self.realize(direction, index, close_price)))
    }

    fn long_pips(&self, bid_close: f64) -> f64 {
        self.policy.pips(bid_close - self.position.entry_price)
    }

    fn short_pips(&self, ask_close: f64) -> f64 {
        self.policy.pips(self.position.entry_price - ask_close)
    }

    fn mark(&mut self, pips: f64) {
        let profit = self.policy.profit(pips, self.position.size);
        self.position.unrealized_pips = pips;
        self.position.unrealized_profit = profit;
        self.account.running_profit = profit;
    }

    /// Book the open position: history, statistics, equity, then reset.
    fn realize(&mut self, direction: Direction, index: usize, close_price: f64) -> ClosedTradeRecord {
        let position = self.position;
        let record = self.history.append_history(
            position.opened_at_index,
            position.entry_price,
            index,
            close_price,
            direction,
        );
        self.stats
            .record_trade(position.classification, position.unrealized_pips);
        self.account.equity += position.unrealized_profit;
        self.account.running_profit = 0.0;
        self.position = Position::closed();
        info!(
            direction = direction.label(),
            class = position.classification.label(),
            close_index = index,
            close_price,
            pips = position.unrealized_pips,
            profit = position.unrealized_profit,
            equity = self.account.equity,
            "position closed"
        );
        record
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new(crate::persistence::DEFAULT_EQUITY)
    }
}
