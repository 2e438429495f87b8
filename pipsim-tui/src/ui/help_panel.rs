//! Help overlay — key bindings, drawn centered over the chart.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::AppState;
use crate::theme::Theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, theme, "Trading");
    key(&mut lines, theme, "b / s", "Buy / sell, tracked as a Fade trade");
    key(&mut lines, theme, "n / d", "Buy / sell, tracked as a Trend trade");
    key(&mut lines, theme, "c", "Close the open position");
    lines.push(Line::from(""));

    section(&mut lines, theme, "Chart");
    key(&mut lines, theme, "← / →", "Move 1 candle");
    key(&mut lines, theme, "PgDn / PgUp", "Move 5 candles");
    key(&mut lines, theme, "mouse drag", "Move 15 candles per motion");
    key(&mut lines, theme, "1-4", "Zoom: 450 / 600 / 900 / 1800 candles");
    key(&mut lines, theme, "↑ / ↓", "Vertical scale ±20 pips");
    key(&mut lines, theme, "h", "Toggle closed-trade history");
    lines.push(Line::from(""));

    section(&mut lines, theme, "Session");
    key(&mut lines, theme, "F1 / ?", "Toggle this help");
    key(&mut lines, theme, "Esc / q", "Save and exit");

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(theme.accent_style())
        .style(Style::default().bg(theme.background));

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn section(lines: &mut Vec<Line<'static>>, theme: &Theme, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme.accent_bold())));
}

fn key(lines: &mut Vec<Line<'static>>, theme: &Theme, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>12}  "), theme.accent_style()),
        Span::styled(desc.to_string(), theme.muted_style()),
    ]));
}
