//! Info header — the current bar, account and position readout, plus the
//! per-classification tally.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use pipsim_core::domain::TradeClass;

use crate::app::AppState;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    f.render_widget(Paragraph::new(account_lines(app)), chunks[0]);
    f.render_widget(Paragraph::new(session_lines(app)), chunks[1]);
}

fn account_lines(app: &AppState) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let session = &app.session;
    let engine = session.engine();
    let position = engine.position;
    let index = session.current_index();

    let bar_text = match session.bars().bid_at(index) {
        Ok(bar) => {
            let time = bar
                .time
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| format!("#{index}"));
            format!(
                "{time}  O {:.5}  H {:.5}  L {:.5}  C {:.5}",
                bar.open, bar.high, bar.low, bar.close
            )
        }
        Err(err) => err.to_string(),
    };

    let profit = position.unrealized_profit;
    vec![
        Line::from(Span::styled(bar_text, theme.accent_style())),
        field(app, "Pre-Trade Balance", format!("{:.2}", engine.account.equity), theme.text_style()),
        field(
            app,
            "Equity",
            format!("{:.2}", engine.account.marked_equity()),
            theme.text_style(),
        ),
        field(app, "Profit", format!("{profit:.2}"), Style::default().fg(theme.pnl_color(profit))),
        Line::from(vec![
            Span::styled("Trade Mode: ", theme.muted_style()),
            Span::styled(
                position.mode.label(),
                Style::default().fg(theme.mode_color(position.mode)),
            ),
            Span::styled("   Pips: ", theme.muted_style()),
            Span::styled(
                format!("{:.1}", position.unrealized_pips),
                Style::default().fg(theme.pnl_color(position.unrealized_pips)),
            ),
        ]),
        field(app, "Position Size", format!("{:.6}", position.size), theme.text_style()),
    ]
}

fn session_lines(app: &AppState) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let session = &app.session;
    let viewport = session.viewport();
    let stats = &session.engine().stats;

    let mut lines: Vec<Line> = TradeClass::ALL
        .iter()
        .map(|&class| {
            let s = stats.summary(class);
            Line::from(vec![
                Span::styled(format!("{:<6}", class.label()), theme.accent_style()),
                Span::styled(
                    format!(
                        "{:>3} trades  {:>5.1}% win  ",
                        s.count,
                        s.win_rate * 100.0
                    ),
                    theme.text_style(),
                ),
                Span::styled(
                    format!("{:+.1} pips", s.total_pips),
                    Style::default().fg(theme.pnl_color(s.total_pips)),
                ),
            ])
        })
        .collect();

    lines.push(field(
        app,
        "Zoom",
        format!(
            "{} ({} bars)  Bar {}/{}",
            viewport.zoom.number(),
            viewport.zoom.window_len(),
            viewport.rightmost(),
            session.bars().last_index(),
        ),
        theme.text_style(),
    ));
    lines.push(field(
        app,
        "History",
        if viewport.show_history { "on" } else { "off" }.to_string(),
        theme.text_style(),
    ));
    lines.push(Line::from(Span::styled(
        "Press F1 to toggle help info",
        theme.muted_style(),
    )));
    lines
}

fn field(app: &AppState, name: &str, value: String, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{name}: "), app.theme.muted_style()),
        Span::styled(value, style),
    ])
}
