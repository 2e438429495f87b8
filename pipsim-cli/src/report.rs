//! Report builders behind the CLI commands. Each has a plain-text table and
//! a serde form for `--json`.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use pipsim_core::data::{load_bars, DataLoadError, SourceFiles, Timeframe};
use pipsim_core::domain::{ClosedTradeRecord, TradeClass};
use pipsim_core::persistence::PersistedState;
use pipsim_core::{RiskPolicy, StatisticsLedger, TradeHistory, TradeSummary};

/// Account, viewport and per-classification summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub equity: f64,
    pub rightmost_index: usize,
    pub total_trades: usize,
    pub trend: TradeSummary,
    pub fade: TradeSummary,
}

impl StatsReport {
    pub fn from_state(state: &PersistedState) -> Self {
        let ledger = StatisticsLedger::from_sequences(state.trend.clone(), state.fade.clone());
        Self {
            equity: state.equity,
            rightmost_index: state.rightmost_index,
            total_trades: ledger.total_trades(),
            trend: ledger.summary(TradeClass::Trend),
            fade: ledger.summary(TradeClass::Fade),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Equity: {:.2}\n", self.equity));
        out.push_str(&format!("Chart position: bar {}\n", self.rightmost_index));
        out.push_str(&format!("Closed trades: {}\n", self.total_trades));
        out.push('\n');
        out.push_str(&format!(
            "{:<6} {:>6} {:>5} {:>6} {:>7} {:>10} {:>9} {:>9} {:>9}\n",
            "Class", "Trades", "Wins", "Losses", "Win %", "Total", "Mean", "Best", "Worst"
        ));
        out.push_str(&"-".repeat(76));
        out.push('\n');
        for (class, s) in [(TradeClass::Trend, &self.trend), (TradeClass::Fade, &self.fade)] {
            out.push_str(&format!(
                "{:<6} {:>6} {:>5} {:>6} {:>6.1}% {:>10.1} {:>9.1} {:>9.1} {:>9.1}\n",
                class.label(),
                s.count,
                s.wins,
                s.losses,
                s.win_rate * 100.0,
                s.total_pips,
                s.mean_pips,
                s.best_pips,
                s.worst_pips,
            ));
        }
        out
    }
}

/// Closed trades, optionally limited to those that closed in a bar window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryReport {
    pub from: Option<usize>,
    pub to: Option<usize>,
    pub trades: Vec<ClosedTradeRecord>,
}

impl HistoryReport {
    pub fn from_records(records: Vec<ClosedTradeRecord>, from: Option<usize>, to: Option<usize>) -> Self {
        let history = TradeHistory::from_records(records);
        let trades = history
            .trades_in_view(from.unwrap_or(0), to.unwrap_or(usize::MAX))
            .copied()
            .collect();
        Self { from, to, trades }
    }

    pub fn render(&self) -> String {
        if self.trades.is_empty() {
            return "No closed trades in range.\n".to_string();
        }
        let mut out = String::new();
        out.push_str(&format!(
            "{:>4} {:<5} {:>8} {:>9} {:>8} {:>9} {:>6} {:>8}\n",
            "#", "Dir", "Open @", "Open", "Close @", "Close", "Bars", "Pips"
        ));
        out.push_str(&"-".repeat(63));
        out.push('\n');
        for (i, t) in self.trades.iter().enumerate() {
            out.push_str(&format!(
                "{:>4} {:<5} {:>8} {:>9.5} {:>8} {:>9.5} {:>6} {:>8.1}\n",
                i + 1,
                t.direction.label(),
                t.open_index,
                t.open_price,
                t.close_index,
                t.close_price,
                t.bars_held(),
                RiskPolicy::STANDARD.pips(t.price_move()),
            ));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceEntry {
    pub timeframe: &'static str,
    pub path: Option<PathBuf>,
}

/// What the data directory holds and how much of the hourly series parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataReport {
    pub data_dir: PathBuf,
    pub sources: Vec<SourceEntry>,
    pub hourly_bars: usize,
    pub first_bar: Option<NaiveDateTime>,
    pub last_bar: Option<NaiveDateTime>,
}

impl DataReport {
    /// Locate source files and load the hourly series. Fails like the
    /// simulator would: no hourly file or no parseable bars is an error.
    pub fn scan(data_dir: &Path) -> Result<Self, DataLoadError> {
        let files = SourceFiles::locate(data_dir)?;
        let hourly = files.hourly.clone().ok_or_else(|| DataLoadError::NoSourceFile {
            dir: data_dir.to_path_buf(),
        })?;
        let bars = load_bars(&hourly)?;

        let sources = Timeframe::ALL
            .iter()
            .map(|&tf| SourceEntry {
                timeframe: tf.pattern(),
                path: files.get(tf).map(Path::to_path_buf),
            })
            .collect();

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            sources,
            hourly_bars: bars.len(),
            first_bar: bars.first().and_then(|b| b.time),
            last_bar: bars.last().and_then(|b| b.time),
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Data: {}\n", self.data_dir.display()));
        for source in &self.sources {
            let path = source
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(missing)".to_string());
            out.push_str(&format!("  {:<8} {}\n", source.timeframe, path));
        }
        out.push_str(&format!("Hourly bars: {}\n", self.hourly_bars));
        if let (Some(first), Some(last)) = (self.first_bar, self.last_bar) {
            out.push_str(&format!("Range: {first} to {last}\n"));
        }
        out
    }
}
