//! Bar — one OHLC candle of the replayed series.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// OHLC bar for a single period of the hourly series.
///
/// The timestamp is whatever field 0 of the source line parsed to. The engine
/// never reads it; it is only shown in the chart header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: Option<NaiveDateTime>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time: None,
            open,
            high,
            low,
            close,
        }
    }

    /// Returns true if all four prices are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }

    /// Basic OHLC sanity check: high is the top of the range, low the bottom.
    pub fn is_sane(&self) -> bool {
        self.is_finite()
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Merge a run of consecutive bars into one: first open, highest high,
    /// lowest low, last close. Returns `None` for an empty run.
    pub fn merge(bars: &[Bar]) -> Option<Bar> {
        let first = bars.first()?;
        let last = bars.last()?;
        let high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        Some(Bar {
            time: first.time,
            open: first.open,
            high,
            low,
            close: last.close,
        })
    }
}
