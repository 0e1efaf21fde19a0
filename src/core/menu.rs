//! # Menus and Commands
//!
//! Every discrete thing the user can ask the main screen to do has a
//! [`CommandId`]. The shell owns the static menu layout (labels, ordering);
//! the core only gates which entries are visible for the current page.

use serde::{Deserialize, Serialize};

/// Identifier for every options-menu, context-menu and chrome command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandId {
    // Options menu (document actions)
    ChooseDocument,
    Search,
    Bookmarks,
    MyNotes,
    History,
    Settings,
    Language,
    Download,
    DocumentManager,
    Help,
    // Chrome (handled by the default handler)
    ToggleFullScreen,
    // Context menu
    Notes,
    AddBookmark,
    MyNoteAddEdit,
    Copy,
    ShareVerse,
    SelectText,
}

/// Where a command came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOrigin {
    OptionsMenu,
    ContextMenu,
    KeyPress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub id: CommandId,
    pub origin: CommandOrigin,
}

impl Command {
    pub fn new(id: CommandId, origin: CommandOrigin) -> Self {
        Self { id, origin }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: CommandId,
    pub title: String,
    pub visible: bool,
    pub enabled: bool,
}

/// An ordered, mutable menu. Items are unique by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style add. A second add with the same id replaces the title.
    pub fn with(mut self, id: CommandId, title: &str) -> Self {
        self.add(id, title);
        self
    }

    pub fn add(&mut self, id: CommandId, title: &str) {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => item.title = title.to_string(),
            None => self.items.push(MenuItem {
                id,
                title: title.to_string(),
                visible: true,
                enabled: true,
            }),
        }
    }

    pub fn remove(&mut self, id: CommandId) {
        self.items.retain(|item| item.id != id);
    }

    pub fn set_visible(&mut self, id: CommandId, visible: bool) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.visible = visible;
        }
    }

    pub fn set_enabled(&mut self, id: CommandId, enabled: bool) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.enabled = enabled;
        }
    }

    pub fn get(&self, id: CommandId) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// True if the item exists and is visible.
    pub fn shows(&self, id: CommandId) -> bool {
        self.get(id).is_some_and(|item| item.visible)
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.iter().filter(|item| item.visible)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_replaces_title_for_duplicate_id() {
        let menu = Menu::new()
            .with(CommandId::Copy, "Copy")
            .with(CommandId::Copy, "Copy verse");
        assert_eq!(menu.items().len(), 1);
        assert_eq!(menu.get(CommandId::Copy).unwrap().title, "Copy verse");
    }

    #[test]
    fn test_hidden_items_are_not_shown() {
        let mut menu = Menu::new()
            .with(CommandId::Search, "Search")
            .with(CommandId::Help, "Help");
        menu.set_visible(CommandId::Search, false);
        assert!(!menu.shows(CommandId::Search));
        assert!(menu.shows(CommandId::Help));
        assert_eq!(menu.visible_items().count(), 1);
    }

    #[test]
    fn test_remove_missing_item_is_noop() {
        let mut menu = Menu::new().with(CommandId::Help, "Help");
        menu.remove(CommandId::AddBookmark);
        assert_eq!(menu.items().len(), 1);
    }
}
