//! BarStore — the immutable ask/bid series, loaded once.

use crate::domain::Bar;

use super::DataLoadError;

/// Lookup outside the loaded series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("bar index {index} out of range (series has {len} bars)")]
pub struct IndexOutOfRange {
    pub index: usize,
    pub len: usize,
}

/// Which quote series to read. Buys fill against ask, sells against bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Ask,
    Bid,
}

/// Two equal-length, non-empty bar series.
///
/// Kept as two vectors even when both come from the same file so a real
/// spread can be introduced without touching the engine.
#[derive(Debug, Clone)]
pub struct BarStore {
    ask: Vec<Bar>,
    bid: Vec<Bar>,
}

impl BarStore {
    pub fn new(ask: Vec<Bar>, bid: Vec<Bar>) -> Result<Self, DataLoadError> {
        if ask.len() != bid.len() {
            return Err(DataLoadError::LengthMismatch {
                ask: ask.len(),
                bid: bid.len(),
            });
        }
        if ask.is_empty() {
            return Err(DataLoadError::EmptySeries);
        }
        Ok(Self { ask, bid })
    }

    /// Use one series for both sides (zero spread).
    pub fn from_single_series(bars: Vec<Bar>) -> Result<Self, DataLoadError> {
        Self::new(bars.clone(), bars)
    }

    pub fn len(&self) -> usize {
        self.bid.len()
    }

    /// Always false for a constructed store; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.bid.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.len() - 1
    }

    pub fn bar_at(&self, side: Side, index: usize) -> Result<&Bar, IndexOutOfRange> {
        let series = match side {
            Side::Ask => &self.ask,
            Side::Bid => &self.bid,
        };
        series.get(index).ok_or(IndexOutOfRange {
            index,
            len: series.len(),
        })
    }

    pub fn ask_at(&self, index: usize) -> Result<&Bar, IndexOutOfRange> {
        self.bar_at(Side::Ask, index)
    }

    pub fn bid_at(&self, index: usize) -> Result<&Bar, IndexOutOfRange> {
        self.bar_at(Side::Bid, index)
    }

    /// Bid bars in `start..=end`, clipped to the series. The chart draws bid.
    pub fn bid_window(&self, start: usize, end: usize) -> &[Bar] {
        if self.bid.is_empty() || start > end || start >= self.bid.len() {
            return &[];
        }
        let end = end.min(self.last_index());
        &self.bid[start..=end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let close = 1.1 + i as f64 * 0.001;
                Bar::new(close - 0.0005, close + 0.001, close - 0.001, close)
            })
            .collect()
    }

    #[test]
    fn lookup_in_range() {
        let store = BarStore::from_single_series(bars(5)).unwrap();
        assert_eq!(store.len(), 5);
        assert_eq!(store.last_index(), 4);
        assert!((store.ask_at(2).unwrap().close - 1.102).abs() < 1e-12);
        assert_eq!(store.ask_at(2).unwrap(), store.bid_at(2).unwrap());
    }

    #[test]
    fn lookup_out_of_range() {
        let store = BarStore::from_single_series(bars(5)).unwrap();
        let err = store.bid_at(5).unwrap_err();
        assert_eq!(err, IndexOutOfRange { index: 5, len: 5 });
        assert!(store.ask_at(usize::MAX).is_err());
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = BarStore::new(bars(3), bars(4)).unwrap_err();
        assert!(matches!(err, DataLoadError::LengthMismatch { ask: 3, bid: 4 }));
    }

    #[test]
    fn rejects_empty_series() {
        let err = BarStore::from_single_series(Vec::new()).unwrap_err();
        assert!(matches!(err, DataLoadError::EmptySeries));
    }

    #[test]
    fn separate_series_stay_separate() {
        let ask = bars(3);
        let mut bid = bars(3);
        bid[1].close -= 0.0002;
        let store = BarStore::new(ask, bid).unwrap();
        let spread = store.ask_at(1).unwrap().close - store.bid_at(1).unwrap().close;
        assert!((spread - 0.0002).abs() < 1e-12);
    }

    #[test]
    fn bid_window_clips() {
        let store = BarStore::from_single_series(bars(10)).unwrap();
        assert_eq!(store.bid_window(2, 4).len(), 3);
        assert_eq!(store.bid_window(8, 20).len(), 2);
        assert!(store.bid_window(12, 20).is_empty());
        assert!(store.bid_window(5, 4).is_empty());
    }
}
