//! Top-level UI layout — info header, candle chart, status bar, help overlay.

pub mod chart_panel;
pub mod help_panel;
pub mod info_panel;
pub mod status_bar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::AppState;
use chart_panel::CandleChart;

/// Lines in the info header.
pub const INFO_HEIGHT: u16 = 6;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(INFO_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    info_panel::render(f, chunks[0], app);
    f.render_widget(CandleChart::from_session(&app.session, &app.theme), chunks[1]);
    status_bar::render(f, chunks[2], app);

    if app.session.viewport().show_help {
        help_panel::render(f, centered_rect(60, 70, chunks[1]), app);
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
