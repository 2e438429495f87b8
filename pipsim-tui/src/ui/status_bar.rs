//! Bottom status bar — key hints and the last status message.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, StatusLevel};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let mut spans: Vec<Span> = vec![
        Span::styled(
            " b/n buy  s/d sell  c close  ←/→ scroll  1-4 zoom  F1 help  q quit",
            theme.muted_style(),
        ),
        Span::raw(" | "),
    ];

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme.accent_style(),
            StatusLevel::Warning => theme.warning_style(),
            StatusLevel::Error => theme.error_style(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
