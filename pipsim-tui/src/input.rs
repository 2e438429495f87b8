//! Keyboard and mouse dispatch — raw crossterm events → session actions.

use std::cmp::Ordering;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use pipsim_core::data::IndexOutOfRange;
use pipsim_core::domain::TradeClass;
use pipsim_core::session::Action;
use pipsim_core::viewport::ZoomLevel;

use crate::app::AppState;

/// Translate a key press into an action. Unbound keys map to `None`.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    let action = match key.code {
        KeyCode::Char('b') => Action::OpenLong(TradeClass::Fade),
        KeyCode::Char('n') => Action::OpenLong(TradeClass::Trend),
        KeyCode::Char('s') => Action::OpenShort(TradeClass::Fade),
        KeyCode::Char('d') => Action::OpenShort(TradeClass::Trend),
        KeyCode::Char('c') => Action::Close,
        KeyCode::Left => Action::SCROLL_LEFT,
        KeyCode::Right => Action::SCROLL_RIGHT,
        KeyCode::PageDown => Action::PAGE_LEFT,
        KeyCode::PageUp => Action::PAGE_RIGHT,
        KeyCode::Up => Action::ScaleUp,
        KeyCode::Down => Action::ScaleDown,
        KeyCode::Char('h') => Action::ToggleHistory,
        KeyCode::F(1) | KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
        KeyCode::Char(c @ '1'..='4') => {
            let level = c.to_digit(10).and_then(|d| ZoomLevel::from_number(d as u8))?;
            Action::Zoom(level)
        }
        _ => return None,
    };
    Some(action)
}

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<(), IndexOutOfRange> {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    // Esc dismisses the help overlay before it quits.
    if app.session.viewport().show_help && key.code == KeyCode::Esc {
        return app.dispatch(Action::ToggleHelp);
    }

    match map_key(key) {
        Some(action) => app.dispatch(action),
        None => Ok(()),
    }
}

/// Left-button drag scrolls the chart: every motion event moves a fixed
/// number of candles, dragging right goes back in time.
pub fn handle_mouse(app: &mut AppState, mouse: MouseEvent) -> Result<(), IndexOutOfRange> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.drag_column = Some(mouse.column);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let Some(last) = app.drag_column.replace(mouse.column) else {
                return Ok(());
            };
            if let Some(action) = drag_action(last, mouse.column) {
                app.dispatch(action)?;
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.drag_column = None;
        }
        _ => {}
    }
    Ok(())
}

fn drag_action(from: u16, to: u16) -> Option<Action> {
    match to.cmp(&from) {
        Ordering::Greater => Some(Action::DRAG_BACK),
        Ordering::Less => Some(Action::DRAG_FORWARD),
        Ordering::Equal => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn trade_keys() {
        assert_eq!(map_key(press(KeyCode::Char('b'))), Some(Action::OpenLong(TradeClass::Fade)));
        assert_eq!(map_key(press(KeyCode::Char('n'))), Some(Action::OpenLong(TradeClass::Trend)));
        assert_eq!(map_key(press(KeyCode::Char('s'))), Some(Action::OpenShort(TradeClass::Fade)));
        assert_eq!(map_key(press(KeyCode::Char('d'))), Some(Action::OpenShort(TradeClass::Trend)));
        assert_eq!(map_key(press(KeyCode::Char('c'))), Some(Action::Close));
    }

    #[test]
    fn page_keys_move_five() {
        assert_eq!(map_key(press(KeyCode::PageDown)), Some(Action::Scroll(-5)));
        assert_eq!(map_key(press(KeyCode::PageUp)), Some(Action::Scroll(5)));
    }

    #[test]
    fn zoom_digits() {
        assert_eq!(map_key(press(KeyCode::Char('1'))), Some(Action::Zoom(ZoomLevel::Near)));
        assert_eq!(map_key(press(KeyCode::Char('4'))), Some(Action::Zoom(ZoomLevel::Overview)));
        assert_eq!(map_key(press(KeyCode::Char('5'))), None);
    }

    #[test]
    fn ctrl_c_quits_instead_of_closing() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(Action::Quit));
    }

    #[test]
    fn drag_direction() {
        assert_eq!(drag_action(10, 12), Some(Action::Scroll(-15)));
        assert_eq!(drag_action(12, 10), Some(Action::Scroll(15)));
        assert_eq!(drag_action(10, 10), None);
    }

    const BOUND_CHARS: &str = "bnsdchq?1234";

    proptest! {
        #[test]
        fn unbound_chars_map_to_nothing(c in any::<char>()) {
            prop_assume!(!BOUND_CHARS.contains(c));
            prop_assert_eq!(map_key(press(KeyCode::Char(c))), None);
        }

        #[test]
        fn control_chords_only_quit(c in any::<char>()) {
            let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
            let expected = (c == 'c').then_some(Action::Quit);
            prop_assert_eq!(map_key(key), expected);
        }

        #[test]
        fn drag_moves_against_the_pointer(from in 0u16..500, to in 0u16..500) {
            let action = drag_action(from, to);
            match action {
                None => prop_assert_eq!(from, to),
                Some(Action::Scroll(delta)) => {
                    prop_assert!(from != to);
                    prop_assert_eq!(delta < 0, to > from);
                    prop_assert_eq!(delta.abs(), 15);
                }
                Some(other) => prop_assert!(false, "unexpected {:?}", other),
            }
        }
    }
}
