//! # Reader Engine
//!
//! Plays every content-side collaborator role for the main screen: text
//! view, current-page owner, page control, search and bookmark provider.
//!
//! Page changes are asynchronous. `next_page()` reports `Started`, loads the
//! entry on a tokio task and reports `Completed`. When loads overlap, only the
//! most recently dispatched one is shown; stale results are discarded but
//! still report `Completed` so every `Started` is balanced.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info, warn};
use serde_json::json;
use tokio::runtime::Handle;

use super::{Entry, Library, PassageSource};
use crate::core::ChangeNotifier;
use crate::core::collaborators::{
    BookmarkProvider, ContentRenderer, CurrentPageProvider, LaunchRequest, LaunchTarget, Note,
    PageControlProvider, PageError, SearchProvider,
};
use crate::core::gesture::{TouchEvent, TouchPhase};
use crate::core::navigation::NavigationState;
use crate::core::page::{CurrentPage, Document, PageKind};
use crate::core::result::RequestCode;

const MIN_WRAP_WIDTH: usize = 10;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub show_verse_numbers: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            show_verse_numbers: true,
        }
    }
}

/// One wrapped display line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLine {
    /// 1-based verse (or paragraph) the line belongs to.
    pub verse: u32,
    pub text: String,
}

/// What the text view shows right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageView {
    pub lines: Vec<ViewLine>,
    pub selecting: bool,
}

#[derive(Default)]
struct ViewState {
    volume: usize,
    entry_index: usize,
    entry: Entry,
    verse: u32,
    scroll: usize,
    width: usize,
    height: usize,
    layout: Vec<ViewLine>,
    pending_anchor: Option<f32>,
    applied: Preferences,
    touch_y: Option<f32>,
    selecting: bool,
    bookmarks: Vec<String>,
    clipboard: Option<String>,
    status: Option<String>,
    recalculations: usize,
}

impl ViewState {
    fn show(&mut self, volume: usize, entry_index: usize, entry: Entry) {
        self.volume = volume;
        self.entry_index = entry_index;
        self.entry = entry;
        self.verse = 1;
        self.scroll = 0;
        self.selecting = false;
        self.relayout(false);
    }

    fn relayout(&mut self, keep_position: bool) {
        let ratio = if keep_position && !self.layout.is_empty() {
            self.scroll as f32 / self.layout.len() as f32
        } else {
            0.0
        };

        let width = self.width.max(MIN_WRAP_WIDTH);
        self.layout = self
            .entry
            .verses
            .iter()
            .enumerate()
            .flat_map(|(i, text)| {
                let verse = i as u32 + 1;
                let prefixed = if self.applied.show_verse_numbers {
                    format!("{verse} {text}")
                } else {
                    text.clone()
                };
                textwrap::wrap(&prefixed, width)
                    .into_iter()
                    .map(|line| ViewLine {
                        verse,
                        text: line.into_owned(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let anchor = self.pending_anchor.take().unwrap_or(ratio);
        self.scroll = (anchor * self.layout.len() as f32) as usize;
        self.clamp_scroll();
    }

    fn max_scroll(&self) -> usize {
        self.layout.len().saturating_sub(self.height.max(1))
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Verse at the top of the view, if it changed.
    fn sync_top_verse(&mut self) -> Option<u32> {
        let top = self.layout.get(self.scroll).map(|line| line.verse)?;
        if top == self.verse {
            return None;
        }
        self.verse = top;
        Some(top)
    }

    fn verse_text(&self) -> Option<&str> {
        let index = self.verse.checked_sub(1)? as usize;
        self.entry.verses.get(index).map(String::as_str)
    }
}

pub struct ReaderEngine {
    library: Arc<Library>,
    source: Arc<dyn PassageSource>,
    runtime: Handle,
    view: Arc<Mutex<ViewState>>,
    notifier: Arc<Mutex<Option<ChangeNotifier>>>,
    generation: Arc<AtomicU64>,
    preferences: Mutex<Preferences>,
    line_height: f32,
}

impl ReaderEngine {
    /// `line_height` converts touch units into text lines for drag scrolling.
    pub fn new(
        library: Arc<Library>,
        source: Arc<dyn PassageSource>,
        runtime: Handle,
        start_document: &str,
        line_height: f32,
    ) -> Self {
        let volume = library.index_of(start_document).unwrap_or_else(|| {
            warn!("Unknown start document {}, using first volume", start_document);
            0
        });
        let entry = library
            .volume(volume)
            .and_then(|v| v.entries.first().cloned())
            .unwrap_or_default();

        let mut view = ViewState::default();
        view.show(volume, 0, entry);

        Self {
            library,
            source,
            runtime,
            view: Arc::new(Mutex::new(view)),
            notifier: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
            preferences: Mutex::new(Preferences::default()),
            line_height: line_height.max(1.0),
        }
    }

    /// Connects the engine to the screen's change queue. Loads already in
    /// flight report completion to the most recently attached queue.
    pub fn attach(&self, notifier: ChangeNotifier) {
        *lock(&self.notifier) = Some(notifier);
    }

    fn notifier(&self) -> Option<ChangeNotifier> {
        lock(&self.notifier).clone()
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Starts loading an entry. Completion arrives through the notifier.
    pub fn navigate(&self, volume: usize, entry: usize) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(n) = self.notifier() {
            n.started();
        }

        let source = self.source.clone();
        let view = self.view.clone();
        let latest = self.generation.clone();
        let attached = self.notifier.clone();
        self.runtime.spawn(async move {
            let result = source.load(volume, entry).await;
            {
                let mut state = lock(&view);
                if latest.load(Ordering::SeqCst) != generation {
                    debug!("Discarding superseded load {}", generation);
                } else {
                    match result {
                        Ok(loaded) => state.show(volume, entry, loaded),
                        Err(e) => {
                            warn!("Page load failed: {}", e);
                            state.status = Some(format!("Load failed: {e}"));
                        }
                    }
                }
            }
            // The screen may have been recreated while loading
            let notifier = lock(&attached).clone();
            if let Some(n) = notifier {
                n.completed();
            }
        });
    }

    pub fn open_document(&self, document_id: &str) -> bool {
        match self.library.index_of(document_id) {
            Some(volume) => {
                info!("Opening document {}", document_id);
                self.navigate(volume, 0);
                true
            }
            None => {
                warn!("No such document: {}", document_id);
                false
            }
        }
    }

    /// Tells the engine how much room the text view has.
    pub fn set_viewport(&self, width: usize, height: usize) {
        let mut state = lock(&self.view);
        if state.width == width && state.height == height {
            return;
        }
        state.width = width;
        state.height = height;
        state.relayout(true);
    }

    pub fn scroll_by(&self, delta: isize) {
        let changed = {
            let mut state = lock(&self.view);
            state.scroll = state.scroll.saturating_add_signed(delta);
            state.clamp_scroll();
            state.sync_top_verse()
        };
        if let Some(verse) = changed {
            debug!("Top verse now {}", verse);
            if let Some(n) = self.notifier() {
                n.verse_changed();
            }
        }
    }

    pub fn page_view(&self) -> PageView {
        let state = lock(&self.view);
        let height = state.height.max(1);
        PageView {
            lines: state
                .layout
                .iter()
                .skip(state.scroll)
                .take(height)
                .cloned()
                .collect(),
            selecting: state.selecting,
        }
    }

    pub fn preferences(&self) -> Preferences {
        *lock(&self.preferences)
    }

    /// Stores new preferences. They show up after `apply_preference_settings`.
    pub fn set_preferences(&self, preferences: Preferences) {
        *lock(&self.preferences) = preferences;
    }

    pub fn bookmarks(&self) -> Vec<String> {
        lock(&self.view).bookmarks.clone()
    }

    pub fn clipboard(&self) -> Option<String> {
        lock(&self.view).clipboard.clone()
    }

    pub fn take_status(&self) -> Option<String> {
        lock(&self.view).status.take()
    }

    pub fn recalculations(&self) -> usize {
        lock(&self.view).recalculations
    }

    fn document_at(&self, volume: usize) -> Option<Document> {
        self.library.volume(volume).map(|v| v.document.clone())
    }

    /// `"John 1:3 All things were made by him..."`
    fn current_verse_citation(&self) -> Option<String> {
        let key = self.current().single_key()?;
        let state = lock(&self.view);
        let text = state.verse_text()?;
        Some(format!("{key} {text}"))
    }
}

impl ContentRenderer for ReaderEngine {
    fn update_text(&self, force_recalculate: bool) {
        let mut state = lock(&self.view);
        if force_recalculate {
            state.recalculations += 1;
            state.relayout(true);
        } else if state.layout.is_empty() {
            state.relayout(false);
        }
    }

    fn notes_list(&self) -> Vec<Note> {
        lock(&self.view).entry.notes.clone()
    }

    fn content_height(&self) -> u32 {
        lock(&self.view).layout.len() as u32
    }

    fn scroll_position(&self) -> u32 {
        lock(&self.view).scroll as u32
    }

    fn select_and_copy_text(&self) {
        let mut state = lock(&self.view);
        let height = state.height.max(1);
        let visible: Vec<String> = state
            .layout
            .iter()
            .skip(state.scroll)
            .take(height)
            .map(|line| line.text.clone())
            .collect();
        state.selecting = true;
        state.clipboard = Some(visible.join("\n"));
        state.status = Some("Visible text copied".to_string());
    }

    fn apply_preference_settings(&self) {
        let preferences = self.preferences();
        lock(&self.view).applied = preferences;
    }

    fn page_down(&self) {
        let height = lock(&self.view).height.max(2);
        self.scroll_by(height as isize - 1);
    }

    fn on_touch(&self, event: &TouchEvent) {
        let rows = {
            let mut state = lock(&self.view);
            match event.phase {
                TouchPhase::Press => {
                    state.touch_y = Some(event.y);
                    state.selecting = false;
                    0
                }
                TouchPhase::Move => match state.touch_y {
                    Some(previous) => {
                        let rows = ((previous - event.y) / self.line_height) as isize;
                        if rows != 0 {
                            state.touch_y = Some(previous - rows as f32 * self.line_height);
                        }
                        rows
                    }
                    None => 0,
                },
                TouchPhase::Release | TouchPhase::Cancel => {
                    state.touch_y = None;
                    0
                }
            }
        };
        if rows != 0 {
            self.scroll_by(rows);
        }
    }
}

impl CurrentPageProvider for ReaderEngine {
    fn current(&self) -> CurrentPage {
        let state = lock(&self.view);
        let Some(document) = self.document_at(state.volume) else {
            return CurrentPage::new(PageKind::Bible);
        };
        CurrentPage::new(document.kind)
            .with_document(document)
            .with_key(&state.entry.key)
            .with_verse(state.verse)
    }

    fn restore_state(&self, saved: &NavigationState) {
        let Some(volume) = saved
            .document_id
            .as_deref()
            .and_then(|id| self.library.index_of(id))
        else {
            warn!("Saved document {:?} is not installed", saved.document_id);
            return;
        };
        let entries = self
            .library
            .volume(volume)
            .map(|v| v.entries.as_slice())
            .unwrap_or_default();
        let entry_index = saved
            .key
            .as_deref()
            .and_then(|key| entries.iter().position(|e| e.key == key))
            .unwrap_or(0);
        let Some(entry) = entries.get(entry_index).cloned() else {
            return;
        };

        let mut state = lock(&self.view);
        state.show(volume, entry_index, entry);
        state.pending_anchor = Some(saved.scroll_anchor);
        state.relayout(false);
        state.sync_top_verse();
    }
}

impl SearchProvider for ReaderEngine {
    fn search_request_for(&self, document: &Document) -> Option<LaunchRequest> {
        self.library.index_of(&document.id)?;
        Some(
            LaunchRequest::new(LaunchTarget::Search, RequestCode::Search)
                .with_args(json!({ "document": document.id, "name": document.name })),
        )
    }
}

impl BookmarkProvider for ReaderEngine {
    fn bookmark_current_verse(&self) {
        let Some(key) = self.current().single_key() else {
            return;
        };
        let mut state = lock(&self.view);
        if !state.bookmarks.contains(&key) {
            state.bookmarks.push(key.clone());
        }
        state.status = Some(format!("Bookmarked {key}"));
    }
}

impl PageControlProvider for ReaderEngine {
    fn current_document_title(&self) -> Result<String, PageError> {
        let volume = lock(&self.view).volume;
        self.document_at(volume)
            .map(|d| d.name)
            .ok_or(PageError::NoDocument)
    }

    fn copy_to_clipboard(&self) {
        let citation = self.current_verse_citation();
        let mut state = lock(&self.view);
        match citation {
            Some(text) => {
                state.clipboard = Some(text);
                state.status = Some("Copied".to_string());
            }
            None => state.status = Some("Nothing to copy".to_string()),
        }
    }

    fn share_verse(&self) {
        let Some(citation) = self.current_verse_citation() else {
            return;
        };
        let document = self.current().current_document().map(|d| d.id.clone());
        let shared = match document {
            Some(id) => format!("{citation} ({id})"),
            None => citation,
        };
        let mut state = lock(&self.view);
        state.status = Some(format!("Shared: {shared}"));
        state.clipboard = Some(shared);
    }

    fn next_page(&self) {
        let (volume, entry) = {
            let state = lock(&self.view);
            (state.volume, state.entry_index)
        };
        let count = self.library.volume(volume).map_or(0, |v| v.entries.len());
        if entry + 1 < count {
            self.navigate(volume, entry + 1);
        } else {
            lock(&self.view).status = Some("End of document".to_string());
        }
    }

    fn previous_page(&self) {
        let (volume, entry) = {
            let state = lock(&self.view);
            (state.volume, state.entry_index)
        };
        if entry > 0 {
            self.navigate(volume, entry - 1);
        } else {
            lock(&self.view).status = Some("Start of document".to_string());
        }
    }

    /// Other documents that have an entry for the key on screen.
    fn suggested_documents(&self) -> Vec<Document> {
        let state = lock(&self.view);
        self.library
            .volumes()
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != state.volume)
            .filter(|(_, v)| v.entries.iter().any(|e| e.key == state.entry.key))
            .map(|(_, v)| v.document.clone())
            .collect()
    }
}
