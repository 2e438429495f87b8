//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Equity conservation — equity changes only by realized profit
//! 2. Closed shape — every close leaves the position fully zeroed
//! 3. No-op opens — opening while open never changes state
//! 4. View filter — trades_in_view is an exact inclusive filter
//! 5. Persistence — save then load restores the session state

use proptest::prelude::*;
use pipsim_core::data::BarStore;
use pipsim_core::domain::{Bar, ClosedTradeRecord, Direction, Position, TradeClass};
use pipsim_core::engine::{EngineState, TradeHistory};
use pipsim_core::persistence::{self, PersistedState};

// ── Strategies (proptest) ────────────────────────────────────────────

/// A random walk of bars around 1.1000 with ranges up to 100 pips, so the
/// 80-pip stop fires some of the time.
fn arb_bars() -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::vec((-0.0030..0.0030_f64, 0.0..0.0050_f64, 0.0..0.0050_f64), 2..60)
        .prop_map(|steps| {
            let mut close = 1.1000;
            steps
                .into_iter()
                .map(|(step, up, down)| {
                    let open = close;
                    close = (close + step).max(0.5);
                    Bar::new(open, open.max(close) + up, open.min(close) - down, close)
                })
                .collect()
        })
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Long(TradeClass),
    Short(TradeClass),
    Close,
    Advance,
}

fn arb_class() -> impl Strategy<Value = TradeClass> {
    prop_oneof![Just(TradeClass::Trend), Just(TradeClass::Fade)]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_class().prop_map(Op::Long),
        arb_class().prop_map(Op::Short),
        Just(Op::Close),
        Just(Op::Advance),
        Just(Op::Advance),
    ]
}

fn arb_record() -> impl Strategy<Value = (usize, usize)> {
    (0..200usize, 0..200usize).prop_map(|(a, b)| (a.min(b), a.max(b)))
}

/// Pip values as the ledger stores them: whole tenths.
fn arb_pips() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((-2000i32..2000).prop_map(|t| f64::from(t) / 10.0), 0..30)
}

fn arb_closed_trade() -> impl Strategy<Value = ClosedTradeRecord> {
    (
        arb_record(),
        0.5..2.0_f64,
        0.5..2.0_f64,
        prop_oneof![Just(Direction::Long), Just(Direction::Short)],
    )
        .prop_map(|((open_index, close_index), open_price, close_price, direction)| {
            ClosedTradeRecord {
                open_index,
                open_price,
                close_index,
                close_price,
                direction,
            }
        })
}

// ── 1 + 2. Equity conservation and closed shape ─────────────────────

proptest! {
    #[test]
    fn equity_moves_only_by_realized_profit(
        bars in arb_bars(),
        ops in prop::collection::vec(arb_op(), 1..80),
    ) {
        let store = BarStore::from_single_series(bars).unwrap();
        let mut engine = EngineState::new(100.0);
        let mut index = 0usize;
        let mut realized = 0.0;

        for op in ops {
            let equity_before = engine.account.equity;
            let size = engine.position.size;
            let class = engine.position.classification;
            let closed = match op {
                Op::Long(class) => { engine.open_long(&store, index, class).unwrap(); None }
                Op::Short(class) => { engine.open_short(&store, index, class).unwrap(); None }
                Op::Close => engine.close(&store, index, None).unwrap(),
                Op::Advance => {
                    index = (index + 1).min(store.last_index());
                    engine.tick(&store, index).unwrap()
                }
            };

            match closed {
                Some(_) => {
                    let pips = *engine.stats.pips(class).last().unwrap();
                    let delta = engine.account.equity - equity_before;
                    prop_assert!((delta - pips * size * 100.0).abs() < 1e-12);
                    prop_assert_eq!(engine.position, Position::closed());
                    prop_assert_eq!(engine.account.running_profit, 0.0);
                    realized += delta;
                }
                None => prop_assert_eq!(engine.account.equity, equity_before),
            }
            prop_assert!(engine.position.is_consistent());
        }

        prop_assert!((engine.account.equity - (100.0 + realized)).abs() < 1e-9);
        prop_assert_eq!(engine.stats.total_trades(), engine.history.len());
    }

    /// Stop-loss closes always record the stop price as the fill.
    #[test]
    fn stop_fill_is_stop_price(bars in arb_bars(), short in any::<bool>()) {
        let store = BarStore::from_single_series(bars).unwrap();
        let mut engine = EngineState::new(100.0);
        if short {
            engine.open_short(&store, 0, TradeClass::Trend).unwrap();
        } else {
            engine.open_long(&store, 0, TradeClass::Trend).unwrap();
        }
        let stop = engine.position.stop_loss_price;
        for i in 1..store.len() {
            if let Some(record) = engine.tick(&store, i).unwrap() {
                prop_assert_eq!(record.close_price, stop);
                prop_assert_eq!(record.direction, if short { Direction::Short } else { Direction::Long });
                break;
            }
        }
    }
}

// ── 3. No-op opens ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn open_while_open_is_noop(
        bars in arb_bars(),
        first_long in any::<bool>(),
        second_long in any::<bool>(),
        class in arb_class(),
    ) {
        let store = BarStore::from_single_series(bars).unwrap();
        let mut engine = EngineState::new(100.0);
        if first_long {
            engine.open_long(&store, 0, TradeClass::Trend).unwrap();
        } else {
            engine.open_short(&store, 0, TradeClass::Trend).unwrap();
        }
        let position = engine.position;
        let account = engine.account;
        let last = store.last_index();
        let opened = if second_long {
            engine.open_long(&store, last, class).unwrap()
        } else {
            engine.open_short(&store, last, class).unwrap()
        };
        prop_assert!(!opened);
        prop_assert_eq!(engine.position, position);
        prop_assert_eq!(engine.account, account);
    }
}

// ── 4. View filter ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn trades_in_view_exact_filter(
        spans in prop::collection::vec(arb_record(), 0..40),
        a in 0..220usize,
        b in 0..220usize,
    ) {
        let mut history = TradeHistory::new();
        for (open, close) in &spans {
            history.append_history(*open, 1.1, *close, 1.2, Direction::Long);
        }
        let got: Vec<usize> = history
            .trades_in_view(a, b)
            .map(|r| r.close_index)
            .collect();
        let expected: Vec<usize> = spans
            .iter()
            .map(|(_, close)| *close)
            .filter(|c| *c >= a && *c <= b)
            .collect();
        prop_assert_eq!(got, expected);
        prop_assert_eq!(history.trades_in_view(0, usize::MAX).count(), spans.len());
    }
}

// ── 5. Persistence round trip ───────────────────────────────────────

proptest! {
    #[test]
    fn save_then_load_restores_state(
        equity in 1.0..1_000_000.0_f64,
        rightmost_index in 0..200_000usize,
        fade in arb_pips(),
        trend in arb_pips(),
        history in prop::collection::vec(arb_closed_trade(), 0..20),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let state = PersistedState { equity, rightmost_index, fade, trend, history };
        persistence::save(dir.path(), &state).unwrap();
        prop_assert_eq!(persistence::load(dir.path()), state);
    }
}
