//! Candle chart panel — the bid window rendered with direct buffer writes.
//!
//! - The window is compressed into the plot width by merging runs of
//!   consecutive bars, right-aligned so the current bar is the last column
//! - The vertical range spans `pip_height` pips centred on the window
//! - Gridlines every 20 pips, labeled on the right margin
//! - Open position: dashed entry and stop-loss lines
//! - History: each closed trade is a dotted segment from entry to exit

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use pipsim_core::domain::{Bar, ClosedTradeRecord, Position};
use pipsim_core::session::Session;

use crate::theme::Theme;

/// Spacing between gridlines.
pub const GRID_PIPS: u32 = 20;
const PIP: f64 = 0.0001;
/// Right margin reserved for gridline price labels.
const LABEL_WIDTH: u16 = 8;

pub struct CandleChart<'a> {
    bars: &'a [Bar],
    first_index: usize,
    pip_height: u32,
    position: Option<Position>,
    trades: Vec<&'a ClosedTradeRecord>,
    theme: &'a Theme,
}

impl<'a> CandleChart<'a> {
    /// `bars` is the visible window; `first_index` is the series index of
    /// its first bar.
    pub fn new(bars: &'a [Bar], first_index: usize, pip_height: u32, theme: &'a Theme) -> Self {
        Self {
            bars,
            first_index,
            pip_height,
            position: None,
            trades: Vec::new(),
            theme,
        }
    }

    /// Overlay an open position. A closed position draws nothing.
    pub fn position(mut self, position: Position) -> Self {
        self.position = position.is_open().then_some(position);
        self
    }

    pub fn trades(mut self, trades: Vec<&'a ClosedTradeRecord>) -> Self {
        self.trades = trades;
        self
    }

    /// Chart of the session's current window, position and visible history.
    pub fn from_session(session: &'a Session, theme: &'a Theme) -> Self {
        let viewport = session.viewport();
        let start = viewport.window_start();
        let bars = session.bars().bid_window(start, viewport.rightmost());
        Self::new(bars, start, viewport.pip_height, theme)
            .position(session.engine().position)
            .trades(session.visible_trades())
    }

    fn last_index(&self) -> usize {
        self.first_index + self.bars.len().saturating_sub(1)
    }

    fn draw_gridlines(&self, plot: &Plot, buf: &mut Buffer) {
        let step = f64::from(GRID_PIPS) * PIP;
        let grid_style = Style::default()
            .fg(self.theme.doji)
            .add_modifier(Modifier::DIM);
        let label_style = Style::default().fg(self.theme.bear);
        let label_x = plot.area.right() + 1;

        let mut level = (plot.y_lower / step).ceil() * step;
        let mut last_row = None;
        while level <= plot.y_upper {
            let row = plot.row(level);
            if last_row != Some(row) {
                if let Some(y) = plot.y(row) {
                    for x in (plot.area.left()..plot.area.right()).step_by(2) {
                        buf.set_string(x, y, "·", grid_style);
                    }
                    let label = format!("{level:.4}");
                    buf.set_stringn(label_x, y, &label, usize::from(LABEL_WIDTH - 1), label_style);
                }
                last_row = Some(row);
            }
            level += step;
        }
    }

    fn draw_candles(&self, plot: &Plot, buf: &mut Buffer) {
        let wick_style = Style::default().fg(self.theme.doji);
        let count = plot.columns.len() as i32;

        for (i, bar) in plot.columns.iter().enumerate() {
            let Some(x) = plot.x(plot.right_x() - (count - 1 - i as i32)) else {
                continue;
            };
            let style = Style::default().fg(self.theme.candle_color(bar));

            let high_row = plot.clamp_row(plot.row(bar.high));
            let low_row = plot.clamp_row(plot.row(bar.low));
            let body_top = plot.clamp_row(plot.row(bar.open.max(bar.close)));
            let body_bot = plot.clamp_row(plot.row(bar.open.min(bar.close)));

            for row in high_row..body_top {
                if let Some(y) = plot.y(row) {
                    buf.set_string(x, y, "│", wick_style);
                }
            }

            let body = if bar.is_bullish() {
                "█"
            } else if bar.is_bearish() {
                "▓"
            } else {
                "─"
            };
            for row in body_top..=body_bot {
                if let Some(y) = plot.y(row) {
                    buf.set_string(x, y, body, style);
                }
            }

            for row in (body_bot + 1)..=low_row {
                if let Some(y) = plot.y(row) {
                    buf.set_string(x, y, "│", wick_style);
                }
            }
        }
    }

    fn draw_history(&self, plot: &Plot, buf: &mut Buffer) {
        let last_index = self.last_index();
        for trade in &self.trades {
            let style = Style::default().fg(self.theme.direction_color(trade.direction));
            let x0 = plot.column_of(trade.open_index, last_index);
            let y0 = plot.row(trade.open_price);
            let x1 = plot.column_of(trade.close_index, last_index);
            let y1 = plot.row(trade.close_price);

            let steps = (x1 - x0).abs().max((y1 - y0).abs()).clamp(1, 4096);
            for s in 1..steps {
                let t = f64::from(s) / f64::from(steps);
                let x = x0 + (f64::from(x1 - x0) * t).round() as i32;
                let y = y0 + (f64::from(y1 - y0) * t).round() as i32;
                plot.put(buf, x, y, "·", style);
            }
            plot.put(buf, x0, y0, "o", style.add_modifier(Modifier::BOLD));
            plot.put(buf, x1, y1, "x", style.add_modifier(Modifier::BOLD));
        }
    }

    fn draw_position(&self, plot: &Plot, buf: &mut Buffer) {
        let Some(position) = self.position else {
            return;
        };
        let lines = [
            (
                position.entry_price,
                self.theme.order,
                format!("{} {:.5}", position.mode.label(), position.entry_price),
            ),
            (
                position.stop_loss_price,
                self.theme.stop,
                format!("SL {:.5}", position.stop_loss_price),
            ),
        ];

        for (price, color, label) in lines {
            let Some(y) = plot.y(plot.row(price)) else {
                continue;
            };
            let style = Style::default().fg(color).add_modifier(Modifier::DIM);
            for x in plot.area.left()..plot.area.right() {
                if (x - plot.area.left()) % 3 == 0 {
                    buf.set_string(x, y, "-", style);
                }
            }
            let label_style = Style::default().fg(color).add_modifier(Modifier::BOLD);
            buf.set_stringn(
                plot.area.left(),
                y,
                &label,
                usize::from(plot.area.width),
                label_style,
            );
        }
    }
}

impl Widget for CandleChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.bars.is_empty() {
            let block = Block::default()
                .title(" Chart [No Data] ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.muted))
                .style(Style::default().bg(self.theme.background));
            block.render(area, buf);
            return;
        }

        let title = format!(
            " Bid {}..{} | {} bars | {} pips ",
            self.first_index,
            self.last_index(),
            self.bars.len(),
            self.pip_height,
        );
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));

        let inner = block.inner(area);
        block.render(area, buf);

        let plot_width = inner.width.saturating_sub(LABEL_WIDTH);
        if plot_width == 0 || inner.height < 2 {
            return;
        }
        let plot = Plot::new(
            Rect::new(inner.x, inner.y, plot_width, inner.height),
            self.bars,
            self.pip_height,
        );

        self.draw_gridlines(&plot, buf);
        self.draw_candles(&plot, buf);
        self.draw_history(&plot, buf);
        self.draw_position(&plot, buf);
    }
}

/// Geometry of the plot area: merged columns and the price → row mapping.
struct Plot {
    area: Rect,
    /// Bars merged into each column.
    per_column: usize,
    /// Merged bars, leftmost first.
    columns: Vec<Bar>,
    y_lower: f64,
    y_upper: f64,
}

impl Plot {
    fn new(area: Rect, bars: &[Bar], pip_height: u32) -> Self {
        let per_column = bars.len().div_ceil(usize::from(area.width)).max(1);
        let mut columns: Vec<Bar> = bars.rchunks(per_column).filter_map(Bar::merge).collect();
        columns.reverse();

        let low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let mid = (low + high) / 2.0;
        let half = f64::from(pip_height) * PIP / 2.0;

        Self {
            area,
            per_column,
            columns,
            y_lower: mid - half,
            y_upper: mid + half,
        }
    }

    /// Row offset from the plot top. May fall outside the plot.
    fn row(&self, price: f64) -> i32 {
        let span = self.y_upper - self.y_lower;
        if span <= 0.0 {
            return 0;
        }
        let frac = (self.y_upper - price) / span;
        (frac * f64::from(self.area.height - 1)).round() as i32
    }

    /// Keeps loops over off-screen rows short.
    fn clamp_row(&self, row: i32) -> i32 {
        row.clamp(-1, i32::from(self.area.height))
    }

    fn y(&self, row: i32) -> Option<u16> {
        (0..i32::from(self.area.height))
            .contains(&row)
            .then(|| self.area.y + row as u16)
    }

    fn right_x(&self) -> i32 {
        i32::from(self.area.right()) - 1
    }

    fn x(&self, column: i32) -> Option<u16> {
        (i32::from(self.area.left())..i32::from(self.area.right()))
            .contains(&column)
            .then_some(column as u16)
    }

    /// Screen column of series `index`, given the series index of the last
    /// visible bar. Indices before the window land left of the plot.
    fn column_of(&self, index: usize, last_index: usize) -> i32 {
        let from_end = last_index.saturating_sub(index) / self.per_column;
        self.right_x() - i32::try_from(from_end).unwrap_or(i32::MAX / 2)
    }

    fn put(&self, buf: &mut Buffer, x: i32, row: i32, symbol: &str, style: Style) {
        if let (Some(x), Some(y)) = (self.x(x), self.y(row)) {
            buf.set_string(x, y, symbol, style);
        }
    }
}
