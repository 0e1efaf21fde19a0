//! # Current Page
//!
//! The one navigable unit of content on screen (a Bible chapter, a
//! dictionary entry, a search result list...). Pages are owned by the
//! content engine; the core only reads them through
//! [`CurrentPageProvider`](crate::core::collaborators::CurrentPageProvider).
//!
//! Each variant declares its capabilities explicitly and contributes to
//! menus by composition: the variant picks which base entries survive, no
//! per-variant subclassing.

use serde::{Deserialize, Serialize};

use crate::core::menu::{CommandId, Menu};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageKind {
    Bible,
    Commentary,
    Dictionary,
    GeneralBook,
    Search,
}

impl PageKind {
    /// Verse-keyed pages address a single verse within the page.
    fn is_verse_keyed(self) -> bool {
        matches!(self, PageKind::Bible | PageKind::Commentary)
    }

    fn label(self) -> &'static str {
        match self {
            PageKind::Bible => "Bible",
            PageKind::Commentary => "Commentary",
            PageKind::Dictionary => "Dictionary",
            PageKind::GeneralBook => "Book",
            PageKind::Search => "Search",
        }
    }

    /// Context entries this variant strips before display.
    fn context_exclusions(self) -> &'static [CommandId] {
        const VERSE_ONLY: &[CommandId] = &[
            CommandId::AddBookmark,
            CommandId::MyNoteAddEdit,
            CommandId::ShareVerse,
        ];
        const SEARCH: &[CommandId] = &[
            CommandId::AddBookmark,
            CommandId::MyNoteAddEdit,
            CommandId::ShareVerse,
            CommandId::Notes,
        ];
        match self {
            PageKind::Bible | PageKind::Commentary => &[],
            PageKind::Dictionary | PageKind::GeneralBook => VERSE_ONLY,
            PageKind::Search => SEARCH,
        }
    }
}

/// A loaded document (a translation, a commentary, a dictionary...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub kind: PageKind,
}

impl Document {
    pub fn new(id: &str, name: &str, kind: PageKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentPage {
    kind: PageKind,
    document: Option<Document>,
    key: Option<String>,
    verse: Option<u32>,
}

impl CurrentPage {
    pub fn new(kind: PageKind) -> Self {
        Self {
            kind,
            document: None,
            key: None,
            verse: None,
        }
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn with_verse(mut self, verse: u32) -> Self {
        self.verse = Some(verse);
        self
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn is_single_key(&self) -> bool {
        self.kind.is_verse_keyed()
    }

    pub fn is_searchable(&self) -> bool {
        self.kind != PageKind::Search && self.document.is_some()
    }

    pub fn current_document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// The single verse this page is positioned on, e.g. `"John 3:16"`.
    /// `None` for pages that are not verse-keyed or have no key yet.
    pub fn single_key(&self) -> Option<String> {
        if !self.is_single_key() {
            return None;
        }
        let key = self.key.as_deref()?;
        Some(format!("{}:{}", key, self.verse.unwrap_or(1)))
    }

    /// Text for the page-title label.
    pub fn page_title(&self) -> String {
        self.single_key()
            .or_else(|| self.key.clone())
            .unwrap_or_else(|| self.kind.label().to_string())
    }

    pub fn contribute_options_menu(&self, menu: &mut Menu) {
        menu.set_visible(CommandId::Search, self.is_searchable());
        // Personal notes are keyed by verse
        menu.set_enabled(CommandId::MyNotes, self.is_single_key());
    }

    pub fn contribute_context_menu(&self, menu: &mut Menu) {
        for id in self.kind.context_exclusions() {
            menu.remove(*id);
        }
        if self.document.is_none() {
            menu.set_enabled(CommandId::Copy, false);
            menu.set_enabled(CommandId::SelectText, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_menu() -> Menu {
        Menu::new()
            .with(CommandId::Notes, "Notes")
            .with(CommandId::AddBookmark, "Bookmark verse")
            .with(CommandId::MyNoteAddEdit, "My note")
            .with(CommandId::Copy, "Copy")
            .with(CommandId::ShareVerse, "Share")
            .with(CommandId::SelectText, "Select text")
    }

    fn kjv() -> Document {
        Document::new("KJV", "King James Version", PageKind::Bible)
    }

    #[test]
    fn test_bible_page_is_single_key_and_searchable() {
        let page = CurrentPage::new(PageKind::Bible)
            .with_document(kjv())
            .with_key("John 3")
            .with_verse(16);
        assert!(page.is_single_key());
        assert!(page.is_searchable());
        assert_eq!(page.single_key().as_deref(), Some("John 3:16"));
        assert_eq!(page.page_title(), "John 3:16");
    }

    #[test]
    fn test_dictionary_page_title_is_key() {
        let page = CurrentPage::new(PageKind::Dictionary)
            .with_document(Document::new("Eastons", "Easton's", PageKind::Dictionary))
            .with_key("Logos");
        assert!(!page.is_single_key());
        assert_eq!(page.single_key(), None);
        assert_eq!(page.page_title(), "Logos");
    }

    #[test]
    fn test_page_without_document_is_not_searchable() {
        assert!(!CurrentPage::new(PageKind::Bible).is_searchable());
    }

    #[test]
    fn test_search_page_hides_search_entry() {
        let page = CurrentPage::new(PageKind::Search).with_document(kjv());
        let mut menu = Menu::new().with(CommandId::Search, "Search");
        page.contribute_options_menu(&mut menu);
        assert!(!menu.shows(CommandId::Search));
    }

    #[test]
    fn test_non_single_key_context_menu_drops_verse_entries() {
        let page = CurrentPage::new(PageKind::GeneralBook)
            .with_document(Document::new("Pilgrim", "Pilgrim's Progress", PageKind::GeneralBook))
            .with_key("Part 1");
        let mut menu = context_menu();
        page.contribute_context_menu(&mut menu);
        assert!(menu.get(CommandId::AddBookmark).is_none());
        assert!(menu.get(CommandId::MyNoteAddEdit).is_none());
        assert!(menu.shows(CommandId::Copy));
        assert!(menu.shows(CommandId::Notes));
    }

    #[test]
    fn test_bible_context_menu_keeps_everything() {
        let page = CurrentPage::new(PageKind::Bible).with_document(kjv()).with_key("Gen 1");
        let mut menu = context_menu();
        page.contribute_context_menu(&mut menu);
        assert_eq!(menu, context_menu());
    }
}
