//! Viewport — which slice of the series is on screen.
//!
//! The rightmost visible bar is also the "current" bar the engine trades
//! against. Navigation is clamped so the window never runs off either end
//! of the series.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Bars per arrow-key scroll.
pub const SCROLL_STEP: isize = 1;
/// Bars per PageUp/PageDown.
pub const PAGE_STEP: isize = 5;
/// Bars per mouse-drag motion event.
pub const DRAG_STEP: isize = 15;

pub const DEFAULT_PIP_HEIGHT: u32 = 800;
pub const PIP_HEIGHT_STEP: u32 = 20;
pub const MIN_PIP_HEIGHT: u32 = 20;

/// Zoom presets. Only rendering density changes; the engine is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZoomLevel {
    #[default]
    Near,
    Medium,
    Far,
    Overview,
}

impl ZoomLevel {
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(ZoomLevel::Near),
            2 => Some(ZoomLevel::Medium),
            3 => Some(ZoomLevel::Far),
            4 => Some(ZoomLevel::Overview),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            ZoomLevel::Near => 1,
            ZoomLevel::Medium => 2,
            ZoomLevel::Far => 3,
            ZoomLevel::Overview => 4,
        }
    }

    /// Candles in the visible window.
    pub fn window_len(self) -> usize {
        match self {
            ZoomLevel::Near => 450,
            ZoomLevel::Medium => 600,
            ZoomLevel::Far => 900,
            ZoomLevel::Overview => 1800,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    rightmost: usize,
    pub zoom: ZoomLevel,
    /// Vertical scale: how many pips the chart height spans.
    pub pip_height: u32,
    pub show_history: bool,
    pub show_help: bool,
}

impl Viewport {
    /// A viewport at `rightmost`, clamped to a series of `len` bars.
    pub fn new(rightmost: usize, zoom: ZoomLevel, len: usize) -> Self {
        let mut viewport = Self {
            rightmost,
            zoom,
            pip_height: DEFAULT_PIP_HEIGHT,
            show_history: true,
            show_help: false,
        };
        viewport.clamp(len);
        viewport
    }

    pub fn rightmost(&self) -> usize {
        self.rightmost
    }

    /// Lowest allowed rightmost index: a full window when the series is long
    /// enough, otherwise the last bar.
    pub fn min_rightmost(&self, len: usize) -> usize {
        let last = len.saturating_sub(1);
        self.zoom.window_len().saturating_sub(1).min(last)
    }

    pub fn clamp(&mut self, len: usize) {
        let last = len.saturating_sub(1);
        self.rightmost = self.rightmost.clamp(self.min_rightmost(len), last);
    }

    /// Move by `delta` bars (negative is back in time), then clamp.
    pub fn scroll(&mut self, delta: isize, len: usize) {
        self.rightmost = self.rightmost.saturating_add_signed(delta);
        self.clamp(len);
    }

    pub fn set_zoom(&mut self, zoom: ZoomLevel, len: usize) {
        self.zoom = zoom;
        self.clamp(len);
    }

    pub fn window_start(&self) -> usize {
        (self.rightmost + 1).saturating_sub(self.zoom.window_len())
    }

    /// Indices currently on screen.
    pub fn window(&self) -> RangeInclusive<usize> {
        self.window_start()..=self.rightmost
    }

    pub fn scale_up(&mut self) {
        self.pip_height = self.pip_height.saturating_add(PIP_HEIGHT_STEP);
    }

    pub fn scale_down(&mut self) {
        self.pip_height = self
            .pip_height
            .saturating_sub(PIP_HEIGHT_STEP)
            .max(MIN_PIP_HEIGHT);
    }
}
