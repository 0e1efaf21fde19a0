use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Duration;

use crate::core::command::KeyCode as PageKey;
use crate::core::gesture::TouchPhase;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Delivered to the main screen
    PageKey(PageKey),
    Touch(TouchPhase, u16, u16),
    Resize(u16, u16),

    // Menus and overlays
    OpenOptionsMenu,
    OpenContextMenu,
    ToggleFullScreen,
    CursorUp,
    CursorDown,
    Submit,
    Escape,

    // TUI-local events (handled directly in TUI)
    ScrollUp,
    ScrollDown,
    PageDown,
    InputChar(char),
    Quit,
    ForceQuit, // Ctrl+C quits from anywhere
}

/// Poll for an event with timeout
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    if !event::poll(timeout).unwrap_or(false) {
        return None;
    }
    match event::read() {
        Ok(raw) => map_event(raw),
        Err(e) => {
            log::warn!("Failed to read terminal event: {}", e);
            None
        }
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

pub fn map_event(raw: Event) -> Option<TuiEvent> {
    match raw {
        Event::Key(key_event) => map_key(key_event),
        Event::Mouse(mouse_event) => map_mouse(mouse_event),
        Event::Resize(width, height) => Some(TuiEvent::Resize(width, height)),
        _ => None,
    }
}

fn map_key(key_event: KeyEvent) -> Option<TuiEvent> {
    // Key-up reports arrive with the keyboard enhancement protocol
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    log::debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code,
        key_event.modifiers
    );
    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
        (_, KeyCode::Left) => Some(TuiEvent::PageKey(PageKey::Left)),
        (_, KeyCode::Right) => Some(TuiEvent::PageKey(PageKey::Right)),
        (_, KeyCode::Char('/')) => Some(TuiEvent::PageKey(PageKey::Search)),
        (_, KeyCode::Char('m')) => Some(TuiEvent::OpenOptionsMenu),
        (_, KeyCode::Char('c')) => Some(TuiEvent::OpenContextMenu),
        (_, KeyCode::Char('f')) => Some(TuiEvent::ToggleFullScreen),
        (_, KeyCode::Char('q')) => Some(TuiEvent::Quit),
        (_, KeyCode::Char(' ')) | (_, KeyCode::PageDown) => Some(TuiEvent::PageDown),
        (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
        (_, KeyCode::Up) => Some(TuiEvent::CursorUp),
        (_, KeyCode::Down) => Some(TuiEvent::CursorDown),
        (_, KeyCode::Enter) => Some(TuiEvent::Submit),
        (_, KeyCode::Esc) => Some(TuiEvent::Escape),
        _ => None,
    }
}

fn map_mouse(mouse_event: MouseEvent) -> Option<TuiEvent> {
    let (col, row) = (mouse_event.column, mouse_event.row);
    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(TuiEvent::Touch(TouchPhase::Press, col, row)),
        MouseEventKind::Drag(MouseButton::Left) => Some(TuiEvent::Touch(TouchPhase::Move, col, row)),
        MouseEventKind::Up(MouseButton::Left) => Some(TuiEvent::Touch(TouchPhase::Release, col, row)),
        MouseEventKind::Down(MouseButton::Right) => Some(TuiEvent::OpenContextMenu),
        MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
        MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_arrows_become_page_keys() {
        assert_eq!(
            map_event(key(KeyCode::Left)),
            Some(TuiEvent::PageKey(PageKey::Left))
        );
        assert_eq!(
            map_event(key(KeyCode::Right)),
            Some(TuiEvent::PageKey(PageKey::Right))
        );
        assert_eq!(
            map_event(key(KeyCode::Char('/'))),
            Some(TuiEvent::PageKey(PageKey::Search))
        );
    }

    #[test]
    fn test_key_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Left,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_event(Event::Key(release)), None);
    }

    #[test]
    fn test_ctrl_c_force_quits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_event(Event::Key(ctrl_c)), Some(TuiEvent::ForceQuit));
        assert_eq!(
            map_event(key(KeyCode::Char('c'))),
            Some(TuiEvent::OpenContextMenu)
        );
    }

    #[test]
    fn test_left_button_is_a_touch_stream() {
        assert_eq!(
            map_event(mouse(MouseEventKind::Down(MouseButton::Left), 3, 4)),
            Some(TuiEvent::Touch(TouchPhase::Press, 3, 4))
        );
        assert_eq!(
            map_event(mouse(MouseEventKind::Drag(MouseButton::Left), 9, 4)),
            Some(TuiEvent::Touch(TouchPhase::Move, 9, 4))
        );
        assert_eq!(
            map_event(mouse(MouseEventKind::Up(MouseButton::Left), 20, 4)),
            Some(TuiEvent::Touch(TouchPhase::Release, 20, 4))
        );
    }

    #[test]
    fn test_right_click_opens_context_menu() {
        assert_eq!(
            map_event(mouse(MouseEventKind::Down(MouseButton::Right), 0, 0)),
            Some(TuiEvent::OpenContextMenu)
        );
    }
}
