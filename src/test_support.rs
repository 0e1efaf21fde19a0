//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::json;

use crate::core::collaborators::{
    BookmarkProvider, ContentRenderer, CurrentPageProvider, LaunchRequest, LaunchTarget, Launcher,
    Note, PageControlProvider, PageError, SearchProvider,
};
use crate::core::gesture::TouchEvent;
use crate::core::navigation::NavigationState;
use crate::core::page::{CurrentPage, Document, PageKind};
use crate::core::result::RequestCode;

#[derive(Default)]
struct Recorded {
    page: Option<CurrentPage>,
    fail_titles: bool,
    search_unavailable: bool,
    scroll: (u32, u32),
    forced_updates: usize,
    preference_applies: usize,
    touches: Vec<TouchEvent>,
    page_downs: usize,
    nexts: usize,
    previouses: usize,
    bookmarks: Vec<String>,
    copies: usize,
    shares: usize,
    selections: usize,
    launches: Vec<LaunchRequest>,
    restored: Option<NavigationState>,
    restore_calls: usize,
}

/// Records every collaborator call. Plays all collaborator roles at once.
pub struct FakeEngine {
    document: Document,
    state: Mutex<Recorded>,
}

impl FakeEngine {
    /// A KJV Bible positioned on Genesis 1.
    pub fn bible() -> Arc<Self> {
        let document = Document::new("KJV", "King James Version", PageKind::Bible);
        let engine = Self {
            document: document.clone(),
            state: Mutex::new(Recorded::default()),
        };
        engine.set_page(
            CurrentPage::new(PageKind::Bible)
                .with_document(document)
                .with_key("Genesis 1"),
        );
        Arc::new(engine)
    }

    fn state(&self) -> MutexGuard<'_, Recorded> {
        self.state.lock().unwrap()
    }

    pub fn document(&self) -> Document {
        self.document.clone()
    }

    pub fn set_page(&self, page: CurrentPage) {
        self.state().page = Some(page);
    }

    /// Moves the Bible page to another chapter.
    pub fn set_key(&self, key: &str) {
        self.set_page(
            CurrentPage::new(PageKind::Bible)
                .with_document(self.document())
                .with_key(key),
        );
    }

    pub fn set_scroll(&self, position: u32, height: u32) {
        self.state().scroll = (position, height);
    }

    pub fn fail_titles(&self, fail: bool) {
        self.state().fail_titles = fail;
    }

    pub fn set_search_available(&self, available: bool) {
        self.state().search_unavailable = !available;
    }

    pub fn forced_updates(&self) -> usize {
        self.state().forced_updates
    }

    pub fn preference_applies(&self) -> usize {
        self.state().preference_applies
    }

    pub fn touches(&self) -> Vec<TouchEvent> {
        self.state().touches.clone()
    }

    pub fn page_downs(&self) -> usize {
        self.state().page_downs
    }

    /// (next, previous) page moves.
    pub fn page_moves(&self) -> (usize, usize) {
        let state = self.state();
        (state.nexts, state.previouses)
    }

    pub fn bookmarks(&self) -> Vec<String> {
        self.state().bookmarks.clone()
    }

    pub fn copies(&self) -> usize {
        self.state().copies
    }

    pub fn shares(&self) -> usize {
        self.state().shares
    }

    pub fn selections(&self) -> usize {
        self.state().selections
    }

    pub fn launches(&self) -> Vec<LaunchRequest> {
        self.state().launches.clone()
    }

    pub fn restored(&self) -> Option<NavigationState> {
        self.state().restored.clone()
    }

    pub fn restore_calls(&self) -> usize {
        self.state().restore_calls
    }
}

impl ContentRenderer for FakeEngine {
    fn update_text(&self, force_recalculate: bool) {
        if force_recalculate {
            self.state().forced_updates += 1;
        }
    }

    fn notes_list(&self) -> Vec<Note> {
        vec![Note {
            key: "Genesis 1:1".to_string(),
            text: "Or, In the beginning".to_string(),
        }]
    }

    fn content_height(&self) -> u32 {
        self.state().scroll.1
    }

    fn scroll_position(&self) -> u32 {
        self.state().scroll.0
    }

    fn select_and_copy_text(&self) {
        self.state().selections += 1;
    }

    fn apply_preference_settings(&self) {
        self.state().preference_applies += 1;
    }

    fn page_down(&self) {
        self.state().page_downs += 1;
    }

    fn on_touch(&self, event: &TouchEvent) {
        self.state().touches.push(*event);
    }
}

impl CurrentPageProvider for FakeEngine {
    fn current(&self) -> CurrentPage {
        self.state()
            .page
            .clone()
            .unwrap_or_else(|| CurrentPage::new(PageKind::Bible))
    }

    fn restore_state(&self, state: &NavigationState) {
        let mut recorded = self.state();
        recorded.restored = Some(state.clone());
        recorded.restore_calls += 1;
    }
}

impl SearchProvider for FakeEngine {
    fn search_request_for(&self, document: &Document) -> Option<LaunchRequest> {
        if self.state().search_unavailable {
            return None;
        }
        Some(
            LaunchRequest::new(LaunchTarget::Search, RequestCode::Search)
                .with_args(json!({ "document": document.id })),
        )
    }
}

impl BookmarkProvider for FakeEngine {
    fn bookmark_current_verse(&self) {
        if let Some(key) = self.current().single_key() {
            self.state().bookmarks.push(key);
        }
    }
}

impl PageControlProvider for FakeEngine {
    fn current_document_title(&self) -> Result<String, PageError> {
        if self.state().fail_titles {
            return Err(PageError::Unavailable("render failed".to_string()));
        }
        Ok(self.document.name.clone())
    }

    fn copy_to_clipboard(&self) {
        self.state().copies += 1;
    }

    fn share_verse(&self) {
        self.state().shares += 1;
    }

    fn next_page(&self) {
        self.state().nexts += 1;
    }

    fn previous_page(&self) {
        self.state().previouses += 1;
    }

    fn suggested_documents(&self) -> Vec<Document> {
        vec![Document::new("MHC", "Matthew Henry", PageKind::Commentary)]
    }
}

impl Launcher for FakeEngine {
    fn launch(&self, request: LaunchRequest) {
        self.state().launches.push(request);
    }
}

/// A fresh, empty directory under the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let unique = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "lectern-test-{}-{}-{}",
        name,
        std::process::id(),
        unique
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
