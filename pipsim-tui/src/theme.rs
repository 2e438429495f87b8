//! Chart palette for the PipSim terminal.
//!
//! Dark charcoal surface with the classic trading-screen colors:
//! - **Bull**: green candles, long entries, long history markers
//! - **Bear**: red candles, stop lines, short history markers
//! - **Doji / grid**: neutral gray for wicks, flat candles and gridlines
//! - **Accent**: cyan for titles and key hints

use ratatui::style::{Color, Modifier, Style};

use pipsim_core::domain::{Bar, Direction, PositionMode};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub bull: Color,
    pub bear: Color,
    pub doji: Color,
    /// Entry line of the open position.
    pub order: Color,
    /// Stop-loss line of the open position.
    pub stop: Color,
    pub warning: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::charcoal()
    }
}

impl Theme {
    pub fn charcoal() -> Self {
        Self {
            background: Color::Rgb(45, 45, 45),
            accent: Color::Rgb(0, 255, 255),
            bull: Color::Rgb(20, 255, 20),
            bear: Color::Rgb(255, 20, 20),
            doji: Color::Rgb(125, 125, 125),
            order: Color::Rgb(20, 255, 20),
            stop: Color::Rgb(255, 20, 20),
            warning: Color::Rgb(255, 140, 0),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    pub fn candle_color(&self, bar: &Bar) -> Color {
        if bar.is_bullish() {
            self.bull
        } else if bar.is_bearish() {
            self.bear
        } else {
            self.doji
        }
    }

    /// Green for gains (including flat), red for losses.
    pub fn pnl_color(&self, value: f64) -> Color {
        if value >= 0.0 {
            self.bull
        } else {
            self.bear
        }
    }

    pub fn mode_color(&self, mode: PositionMode) -> Color {
        match mode {
            PositionMode::Closed => self.text_secondary,
            PositionMode::Long => self.bull,
            PositionMode::Short => self.bear,
        }
    }

    pub fn direction_color(&self, direction: Direction) -> Color {
        match direction {
            Direction::Long => self.bull,
            Direction::Short => self.bear,
        }
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn accent_bold(&self) -> Style {
        self.accent_style().add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.bear).add_modifier(Modifier::BOLD)
    }
}
