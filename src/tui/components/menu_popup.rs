//! # Menu Popup Component
//!
//! Floating list for the options menu and the context menu.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `MenuPopupState` lives in `TuiState` while the menu is open
//! - `MenuPopup` is created each frame with borrowed state
//!
//! Hidden items are left out entirely. Disabled items are drawn dimmed and
//! cannot be chosen.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

use crate::core::menu::{CommandId, Menu, MenuItem};
use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Options,
    Context,
}

impl MenuKind {
    fn title(self) -> &'static str {
        match self {
            MenuKind::Options => " Menu ",
            MenuKind::Context => " Verse ",
        }
    }
}

/// Events emitted by the menu popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    Select(MenuKind, CommandId),
    Dismiss,
}

pub struct MenuPopupState {
    pub kind: MenuKind,
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub list_state: ListState,
}

impl MenuPopupState {
    pub fn new(kind: MenuKind, menu: &Menu) -> Self {
        let items: Vec<MenuItem> = menu.visible_items().cloned().collect();
        let selected = items.iter().position(|item| item.enabled).unwrap_or(0);
        let mut list_state = ListState::default();
        if !items.is_empty() {
            list_state.select(Some(selected));
        }
        Self {
            kind,
            items,
            selected,
            list_state,
        }
    }

    fn step(&mut self, forward: bool) {
        if self.items.is_empty() {
            return;
        }
        let mut index = self.selected;
        // Skip over disabled entries, stopping at the ends
        loop {
            let next = if forward {
                index + 1
            } else {
                match index.checked_sub(1) {
                    Some(i) => i,
                    None => return,
                }
            };
            let Some(item) = self.items.get(next) else {
                return;
            };
            index = next;
            if item.enabled {
                break;
            }
        }
        self.selected = index;
        self.list_state.select(Some(index));
    }
}

impl EventHandler for MenuPopupState {
    type Event = MenuEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<MenuEvent> {
        match event {
            TuiEvent::Escape => Some(MenuEvent::Dismiss),
            TuiEvent::OpenOptionsMenu if self.kind == MenuKind::Options => Some(MenuEvent::Dismiss),
            TuiEvent::OpenContextMenu if self.kind == MenuKind::Context => Some(MenuEvent::Dismiss),
            TuiEvent::CursorUp => {
                self.step(false);
                None
            }
            TuiEvent::CursorDown => {
                self.step(true);
                None
            }
            TuiEvent::Submit => self
                .items
                .get(self.selected)
                .filter(|item| item.enabled)
                .map(|item| MenuEvent::Select(self.kind, item.id)),
            _ => None,
        }
    }
}

/// Transient render wrapper for the menu popup.
pub struct MenuPopup<'a> {
    state: &'a mut MenuPopupState,
}

impl<'a> MenuPopup<'a> {
    pub fn new(state: &'a mut MenuPopupState) -> Self {
        Self { state }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = self
            .state
            .items
            .iter()
            .map(|item| item.title.chars().count() as u16)
            .max()
            .unwrap_or(0)
            .max(12)
            + 4;
        let height = self.state.items.len() as u16 + 2;
        let popup = anchored_rect(width, height, area);

        frame.render_widget(Clear, popup);

        let items: Vec<ListItem> = self
            .state
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if !item.enabled {
                    Style::default().fg(Color::DarkGray)
                } else if i == self.state.selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::styled(format!(" {}", item.title), style))
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(self.state.kind.title());

        frame.render_stateful_widget(List::new(items).block(block), popup, &mut self.state.list_state);
    }
}

/// Top-right corner, clamped to the frame.
fn anchored_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    let [_, column] = Layout::horizontal([Constraint::Min(0), Constraint::Length(width)]).areas(outer);
    let [_, popup, _] = Layout::vertical([
        Constraint::Length(1.min(outer.height.saturating_sub(height))),
        Constraint::Length(height),
        Constraint::Min(0),
    ])
    .areas(column);
    popup
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> Menu {
        let mut menu = Menu::new()
            .with(CommandId::Notes, "Notes")
            .with(CommandId::AddBookmark, "Add bookmark")
            .with(CommandId::Copy, "Copy")
            .with(CommandId::SelectText, "Select text");
        menu.set_enabled(CommandId::AddBookmark, false);
        menu.set_visible(CommandId::Notes, false);
        menu
    }

    #[test]
    fn test_hidden_items_are_left_out() {
        let state = MenuPopupState::new(MenuKind::Context, &menu());
        let ids: Vec<CommandId> = state.items.iter().map(|i| i.id).collect();
        assert_eq!(
            ids,
            vec![CommandId::AddBookmark, CommandId::Copy, CommandId::SelectText]
        );
    }

    #[test]
    fn test_selection_skips_disabled_items() {
        let mut state = MenuPopupState::new(MenuKind::Context, &menu());
        assert_eq!(state.items[state.selected].id, CommandId::Copy);

        state.handle_event(&TuiEvent::CursorUp);
        assert_eq!(state.items[state.selected].id, CommandId::Copy);

        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(MenuEvent::Select(MenuKind::Context, CommandId::SelectText))
        );

        // Bottom of the list stays put
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.items[state.selected].id, CommandId::SelectText);
    }

    #[test]
    fn test_escape_and_same_key_dismiss() {
        let mut state = MenuPopupState::new(MenuKind::Options, &Menu::new().with(CommandId::Help, "Help"));
        assert_eq!(state.handle_event(&TuiEvent::Escape), Some(MenuEvent::Dismiss));
        assert_eq!(
            state.handle_event(&TuiEvent::OpenOptionsMenu),
            Some(MenuEvent::Dismiss)
        );
        assert_eq!(state.handle_event(&TuiEvent::OpenContextMenu), None);
    }

    #[test]
    fn test_empty_menu_selects_nothing() {
        let mut state = MenuPopupState::new(MenuKind::Options, &Menu::new());
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.handle_event(&TuiEvent::Submit), None);
    }
}
