//! Application state — single-owner, main-thread only.
//!
//! Wraps the engine session with the bits only the terminal cares about:
//! the running flag, the status line and mouse-drag tracking.

use pipsim_core::data::IndexOutOfRange;
use pipsim_core::domain::{ClosedTradeRecord, TradeClass};
use pipsim_core::session::{Action, Outcome, Session};
use tracing::{debug, error, info};

use crate::theme::Theme;

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

pub struct AppState {
    pub session: Session,
    pub theme: Theme,
    pub running: bool,
    pub status_message: Option<(String, StatusLevel)>,
    /// Column of the last left-button mouse event while dragging.
    pub drag_column: Option<u16>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            theme: Theme::default(),
            running: true,
            status_message: None,
            drag_column: None,
        }
    }

    /// Apply one input action and report what happened on the status line.
    pub fn dispatch(&mut self, action: Action) -> Result<(), IndexOutOfRange> {
        let class = self.session.engine().position.classification;
        let outcome = self.session.apply(action)?;
        debug!(?action, ?outcome, "action applied");

        match outcome {
            Outcome::Opened(mode) => {
                let position = self.session.engine().position;
                self.set_status(format!(
                    "{} {} at {:.5}, stop {:.5}",
                    mode.label(),
                    position.classification.label(),
                    position.entry_price,
                    position.stop_loss_price,
                ));
            }
            Outcome::Closed(record) => self.report_close(&record, class, "Closed"),
            Outcome::Ignored => match action {
                Action::Close => self.set_warning("No open position"),
                _ => self.set_warning("Position already open; close it first"),
            },
            Outcome::ViewChanged => {}
            Outcome::Quit => {
                info!("quit requested");
                self.running = false;
            }
        }
        Ok(())
    }

    /// Per-frame stop-loss check against the current bar.
    pub fn tick(&mut self) -> Result<(), IndexOutOfRange> {
        let class = self.session.engine().position.classification;
        if let Some(record) = self.session.tick()? {
            self.report_close(&record, class, "Stopped out");
            if let Some((_, level)) = self.status_message.as_mut() {
                *level = StatusLevel::Warning;
            }
        }
        Ok(())
    }

    fn report_close(&mut self, record: &ClosedTradeRecord, class: TradeClass, verb: &str) {
        let pips = self
            .session
            .engine()
            .stats
            .pips(class)
            .last()
            .copied()
            .unwrap_or_default();
        self.set_status(format!(
            "{verb} {} {} at {:.5}: {pips:+.1} pips, equity {:.2}",
            record.direction.label(),
            class.label(),
            record.close_price,
            self.session.engine().account.equity,
        ));
    }

    /// A failed input or tick step is shown on the status line; the frame
    /// loop keeps running.
    pub fn report_failure(&mut self, err: &IndexOutOfRange) {
        error!(error = %err, "frame step failed");
        self.set_error(format!("Bar lookup failed: {err}"));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}
