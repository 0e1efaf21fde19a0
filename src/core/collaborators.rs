//! # Collaborators
//!
//! Everything the main screen talks to but does not own. Implementations are
//! injected at construction time; nothing is looked up globally.
//!
//! All traits are `Send + Sync` because the content engine behind them also
//! runs background page loads.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::gesture::TouchEvent;
use crate::core::navigation::NavigationState;
use crate::core::page::{CurrentPage, Document};
use crate::core::result::RequestCode;

/// Errors reported by the content engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// No document is loaded.
    NoDocument,
    /// The requested key does not exist in the document.
    KeyNotFound(String),
    /// Content could not be produced.
    Unavailable(String),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::NoDocument => write!(f, "no document loaded"),
            PageError::KeyNotFound(key) => write!(f, "key not found: {key}"),
            PageError::Unavailable(msg) => write!(f, "content unavailable: {msg}"),
        }
    }
}

impl std::error::Error for PageError {}

/// A footnote or cross reference attached to the displayed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub key: String,
    pub text: String,
}

/// Secondary interactions the main screen can launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaunchTarget {
    Search,
    ChooseDocument,
    Bookmarks,
    MyNotes,
    MyNoteEdit,
    Notes,
    History,
    Settings,
    Language,
    Download,
    DocumentManager,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRequest {
    pub target: LaunchTarget,
    pub request_code: RequestCode,
    pub args: Value,
}

impl LaunchRequest {
    pub fn new(target: LaunchTarget, request_code: RequestCode) -> Self {
        Self {
            target,
            request_code,
            args: Value::Null,
        }
    }

    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }
}

/// The text view showing the current page.
pub trait ContentRenderer: Send + Sync {
    fn update_text(&self, force_recalculate: bool);
    fn notes_list(&self) -> Vec<Note>;
    fn content_height(&self) -> u32;
    fn scroll_position(&self) -> u32;
    fn select_and_copy_text(&self);
    fn apply_preference_settings(&self);
    fn page_down(&self);
    /// Pass-through target for every raw touch event.
    fn on_touch(&self, event: &TouchEvent);
}

pub trait CurrentPageProvider: Send + Sync {
    fn current(&self) -> CurrentPage;
    fn restore_state(&self, state: &NavigationState);
}

pub trait SearchProvider: Send + Sync {
    /// `None` when no search target exists for this document.
    fn search_request_for(&self, document: &Document) -> Option<LaunchRequest>;
}

pub trait BookmarkProvider: Send + Sync {
    fn bookmark_current_verse(&self);
}

pub trait PageControlProvider: Send + Sync {
    fn current_document_title(&self) -> Result<String, PageError>;
    fn copy_to_clipboard(&self);
    fn share_verse(&self);
    fn next_page(&self);
    fn previous_page(&self);
    /// Alternate documents worth offering for the current page.
    fn suggested_documents(&self) -> Vec<Document>;
}

/// Starts secondary interactions. Completion comes back through
/// [`MainScreen::on_activity_result`](crate::core::screen::MainScreen::on_activity_result).
pub trait Launcher: Send + Sync {
    fn launch(&self, request: LaunchRequest);
}
