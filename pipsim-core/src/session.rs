//! Session — owns the bars, the engine and the viewport; the UI drives it.

use tracing::debug;

use crate::data::{BarStore, IndexOutOfRange};
use crate::domain::{ClosedTradeRecord, PositionMode, TradeClass};
use crate::engine::{EngineState, StatisticsLedger, TradeHistory};
use crate::persistence::PersistedState;
use crate::viewport::{Viewport, ZoomLevel, DRAG_STEP, PAGE_STEP, SCROLL_STEP};

/// Everything the input layer can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    OpenLong(TradeClass),
    OpenShort(TradeClass),
    Close,
    /// Move the window by a number of bars; negative is back in time.
    Scroll(isize),
    Zoom(ZoomLevel),
    ScaleUp,
    ScaleDown,
    ToggleHistory,
    ToggleHelp,
    Quit,
}

impl Action {
    pub const SCROLL_LEFT: Action = Action::Scroll(-SCROLL_STEP);
    pub const SCROLL_RIGHT: Action = Action::Scroll(SCROLL_STEP);
    pub const PAGE_LEFT: Action = Action::Scroll(-PAGE_STEP);
    pub const PAGE_RIGHT: Action = Action::Scroll(PAGE_STEP);
    pub const DRAG_BACK: Action = Action::Scroll(-DRAG_STEP);
    pub const DRAG_FORWARD: Action = Action::Scroll(DRAG_STEP);
}

/// What applying an action did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Opened(PositionMode),
    Closed(ClosedTradeRecord),
    /// The request was a no-op (e.g. open while already open).
    Ignored,
    ViewChanged,
    Quit,
}

pub struct Session {
    bars: BarStore,
    engine: EngineState,
    viewport: Viewport,
}

impl Session {
    /// Restore a session from persisted state; the viewport index is clamped
    /// to the loaded series.
    pub fn new(bars: BarStore, persisted: PersistedState, zoom: ZoomLevel) -> Self {
        let engine = EngineState::with_ledgers(
            persisted.equity,
            StatisticsLedger::from_sequences(persisted.trend, persisted.fade),
            TradeHistory::from_records(persisted.history),
        );
        let viewport = Viewport::new(persisted.rightmost_index, zoom, bars.len());
        if viewport.rightmost() != persisted.rightmost_index {
            debug!(
                restored = persisted.rightmost_index,
                clamped = viewport.rightmost(),
                "viewport index clamped to series"
            );
        }
        Self {
            bars,
            engine,
            viewport,
        }
    }

    pub fn bars(&self) -> &BarStore {
        &self.bars
    }

    pub fn engine(&self) -> &EngineState {
        &self.engine
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The bar the engine trades against: the rightmost visible one.
    pub fn current_index(&self) -> usize {
        self.viewport.rightmost()
    }

    /// Per-frame re-evaluation of the open position.
    pub fn tick(&mut self) -> Result<Option<ClosedTradeRecord>, IndexOutOfRange> {
        let index = self.current_index();
        self.engine.tick(&self.bars, index)
    }

    pub fn apply(&mut self, action: Action) -> Result<Outcome, IndexOutOfRange> {
        let index = self.current_index();
        let len = self.bars.len();
        let outcome = match action {
            Action::OpenLong(class) => {
                if self.engine.open_long(&self.bars, index, class)? {
                    Outcome::Opened(PositionMode::Long)
                } else {
                    Outcome::Ignored
                }
            }
            Action::OpenShort(class) => {
                if self.engine.open_short(&self.bars, index, class)? {
                    Outcome::Opened(PositionMode::Short)
                } else {
                    Outcome::Ignored
                }
            }
            Action::Close => match self.engine.close(&self.bars, index, None)? {
                Some(record) => Outcome::Closed(record),
                None => Outcome::Ignored,
            },
            Action::Scroll(delta) => {
                self.viewport.scroll(delta, len);
                Outcome::ViewChanged
            }
            Action::Zoom(zoom) => {
                self.viewport.set_zoom(zoom, len);
                Outcome::ViewChanged
            }
            Action::ScaleUp => {
                self.viewport.scale_up();
                Outcome::ViewChanged
            }
            Action::ScaleDown => {
                self.viewport.scale_down();
                Outcome::ViewChanged
            }
            Action::ToggleHistory => {
                self.viewport.show_history = !self.viewport.show_history;
                Outcome::ViewChanged
            }
            Action::ToggleHelp => {
                self.viewport.show_help = !self.viewport.show_help;
                Outcome::ViewChanged
            }
            Action::Quit => Outcome::Quit,
        };
        Ok(outcome)
    }

    /// Closed trades to draw in the current window; empty when the history
    /// overlay is off.
    pub fn visible_trades(&self) -> Vec<&ClosedTradeRecord> {
        if !self.viewport.show_history {
            return Vec::new();
        }
        let window = self.viewport.window();
        self.engine
            .history
            .trades_in_view(*window.start(), *window.end())
            .collect()
    }

    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            equity: self.engine.account.equity,
            rightmost_index: self.viewport.rightmost(),
            fade: self.engine.stats.pips(TradeClass::Fade).to_vec(),
            trend: self.engine.stats.pips(TradeClass::Trend).to_vec(),
            history: self.engine.history.records().to_vec(),
        }
    }
}
