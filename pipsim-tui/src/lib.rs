//! PipSim TUI — terminal chart for practising discretionary trades.
//!
//! Panels:
//! 1. Info header — current bar, balance, equity, profit, mode, pips, size
//! 2. Candle chart — replayed bid window with position and history overlays
//! 3. Status bar — key hints and the last message
//! 4. Help — centered key-binding overlay

pub mod app;
pub mod input;
pub mod theme;
pub mod ui;

pub use app::{AppState, StatusLevel};
pub use theme::Theme;
