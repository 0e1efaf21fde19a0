//! # Screen Host
//!
//! Plays the application shell for [`MainScreen`]: turns terminal events
//! into screen entry points, shows the menus the screen builds, runs the
//! secondary interactions it launches as overlays and feeds their results
//! back. A restart request rebuilds the screen the way a platform would
//! recreate it: pause (saving state), then construct and create again.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use log::{debug, info, warn};
use serde_json::json;

use crate::core::collaborators::{ContentRenderer, LaunchRequest, LaunchTarget, Launcher};
use crate::core::gesture::{GestureConfig, TouchEvent};
use crate::core::menu::{CommandId, Menu};
use crate::core::result::{Effect, ResultCode};
use crate::core::store::{FileStore, KeyValueStore, MemoryStore};
use crate::core::{Collaborators, MainScreen};
use crate::library::ReaderEngine;
use crate::library::engine::Preferences;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    Choice, MenuEvent, MenuKind, MenuPopupState, OverlayResult, OverlayState,
};
use crate::tui::event::TuiEvent;

/// Touch units per terminal column and row.
pub const CELL_WIDTH: f32 = 8.0;
pub const CELL_HEIGHT: f32 = 16.0;

/// Scope name of the main screen's state file.
pub const SCREEN_SCOPE: &str = "main_screen";

/// Pages kept for the History overlay.
const HISTORY_LIMIT: usize = 50;

const LANGUAGES: &[(&str, &str)] = &[("English", "en"), ("Deutsch", "de"), ("Français", "fr")];

pub fn screen_height(rows: u16) -> f32 {
    rows as f32 * CELL_HEIGHT
}

/// Queues launch requests until the host can show them.
#[derive(Default)]
pub struct TuiLauncher {
    pending: Mutex<VecDeque<LaunchRequest>>,
}

impl TuiLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> Option<LaunchRequest> {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
    }
}

impl Launcher for TuiLauncher {
    fn launch(&self, request: LaunchRequest) {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(request);
    }
}

/// Where each incarnation of the screen keeps its navigation state.
pub enum StateStores {
    Files(PathBuf),
    Memory(MemoryStore),
}

impl StateStores {
    /// Falls back to memory when the directory is missing or unusable.
    pub fn new(dir: Option<&Path>) -> Self {
        let Some(dir) = dir else {
            warn!("No state directory, navigation state will not survive exit");
            return StateStores::Memory(MemoryStore::new());
        };
        match FileStore::open(dir, SCREEN_SCOPE) {
            Ok(store) => {
                info!("Navigation state at {}", store.path().display());
                StateStores::Files(dir.to_path_buf())
            }
            Err(e) => {
                warn!("State directory unusable ({}), keeping state in memory", e);
                StateStores::Memory(MemoryStore::new())
            }
        }
    }

    pub fn open(&self) -> Box<dyn KeyValueStore> {
        match self {
            StateStores::Files(dir) => match FileStore::open(dir, SCREEN_SCOPE) {
                Ok(store) => Box::new(store),
                Err(e) => {
                    warn!("Failed to reopen state store: {}", e);
                    Box::new(MemoryStore::new())
                }
            },
            StateStores::Memory(store) => Box::new(store.clone()),
        }
    }
}

/// TUI-specific presentation state (not part of core screen logic)
#[derive(Default)]
pub struct TuiState {
    pub menu: Option<MenuPopupState>,
    pub overlay: Option<OverlayState>,
    pub status: String,
}

pub fn options_menu() -> Menu {
    Menu::new()
        .with(CommandId::ChooseDocument, "Choose document")
        .with(CommandId::Search, "Search")
        .with(CommandId::Bookmarks, "Bookmarks")
        .with(CommandId::MyNotes, "My notes")
        .with(CommandId::History, "History")
        .with(CommandId::Settings, "Settings")
        .with(CommandId::Language, "Language")
        .with(CommandId::Download, "Download")
        .with(CommandId::DocumentManager, "Manage documents")
        .with(CommandId::ToggleFullScreen, "Full screen")
        .with(CommandId::Help, "Help")
}

pub fn context_menu() -> Menu {
    Menu::new()
        .with(CommandId::Notes, "Notes")
        .with(CommandId::AddBookmark, "Add bookmark")
        .with(CommandId::MyNoteAddEdit, "My note")
        .with(CommandId::Copy, "Copy")
        .with(CommandId::ShareVerse, "Share")
        .with(CommandId::SelectText, "Select text")
}

pub struct ScreenHost {
    pub screen: MainScreen,
    pub engine: Arc<ReaderEngine>,
    pub tui: TuiState,
    launcher: Arc<TuiLauncher>,
    stores: StateStores,
    gestures: GestureConfig,
    rows: u16,
    started: Instant,
    history: VecDeque<String>,
}

impl ScreenHost {
    pub fn new(
        engine: Arc<ReaderEngine>,
        stores: StateStores,
        gestures: GestureConfig,
        rows: u16,
    ) -> Self {
        let launcher = Arc::new(TuiLauncher::new());
        let screen = build_screen(&engine, &launcher, &stores, gestures, rows);
        let mut host = Self {
            screen,
            engine,
            tui: TuiState::default(),
            launcher,
            stores,
            gestures,
            rows,
            started: Instant::now(),
            history: VecDeque::new(),
        };
        host.screen.create();
        host.record_history();
        host
    }

    /// Applies background changes and opens the next queued interaction.
    /// Returns true when something visible changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = self.screen.pump() > 0;
        if changed {
            self.record_history();
        }
        if let Some(status) = self.engine.take_status() {
            self.tui.status = status;
            changed = true;
        }
        if self.tui.overlay.is_none()
            && let Some(request) = self.launcher.next()
        {
            self.tui.overlay = Some(self.overlay_for(request));
            changed = true;
        }
        changed
    }

    /// Handles one terminal event. Returns true when the app should quit.
    pub fn handle_event(&mut self, event: TuiEvent) -> bool {
        match event {
            TuiEvent::ForceQuit => return true,
            TuiEvent::Resize(_, rows) => {
                self.rows = rows;
                self.screen.on_configuration_changed(screen_height(rows));
                return false;
            }
            _ => {}
        }

        // Overlays and menus are modal
        if let Some(overlay) = self.tui.overlay.as_mut() {
            if let Some(outcome) = overlay.handle_event(&event)
                && let Some(overlay) = self.tui.overlay.take()
            {
                self.finish_overlay(overlay, outcome);
            }
            return false;
        }
        if let Some(menu) = self.tui.menu.as_mut() {
            if let Some(menu_event) = menu.handle_event(&event) {
                self.tui.menu = None;
                if let MenuEvent::Select(kind, id) = menu_event {
                    self.select(kind, id);
                }
            }
            return false;
        }

        self.tui.status.clear();
        match event {
            TuiEvent::Quit => return true,
            TuiEvent::PageKey(key) => {
                if !self.screen.on_key_up(key) {
                    debug!("Key {:?} not handled", key);
                }
            }
            TuiEvent::Touch(phase, col, row) => {
                let touch = TouchEvent::new(
                    phase,
                    col as f32 * CELL_WIDTH,
                    row as f32 * CELL_HEIGHT,
                    self.started.elapsed().as_millis() as u64,
                );
                self.screen.dispatch_touch(&touch);
            }
            TuiEvent::OpenOptionsMenu => {
                let mut menu = self.screen.create_options_menu(options_menu());
                if self.screen.prepare_options_menu(&mut menu) {
                    self.tui.menu = Some(MenuPopupState::new(MenuKind::Options, &menu));
                }
            }
            TuiEvent::OpenContextMenu => {
                let menu = self.screen.create_context_menu(context_menu());
                self.tui.menu = Some(MenuPopupState::new(MenuKind::Context, &menu));
            }
            TuiEvent::ToggleFullScreen => self.select(MenuKind::Options, CommandId::ToggleFullScreen),
            TuiEvent::ScrollUp | TuiEvent::CursorUp => self.engine.scroll_by(-1),
            TuiEvent::ScrollDown | TuiEvent::CursorDown => self.engine.scroll_by(1),
            TuiEvent::PageDown => self.engine.page_down(),
            _ => {}
        }
        false
    }

    /// Saves navigation state. Call before exit.
    pub fn shutdown(&mut self) {
        self.screen.on_pause();
    }

    fn select(&mut self, kind: MenuKind, id: CommandId) {
        let handled = match kind {
            MenuKind::Options => self.screen.on_options_item_selected(id),
            MenuKind::Context => self.screen.on_context_item_selected(id),
        };
        if !handled {
            debug!("{:?} item {:?} not handled", kind, id);
        }
    }

    fn record_history(&mut self) {
        let chrome = self.screen.chrome();
        if !chrome.title_visible {
            return;
        }
        let entry = format!("{} - {}", chrome.document_title, chrome.page_title);
        self.push_history(entry);
    }

    fn push_history(&mut self, entry: String) {
        if self.history.back() != Some(&entry) {
            if self.history.len() == HISTORY_LIMIT {
                self.history.pop_front();
            }
            self.history.push_back(entry);
        }
    }

    fn overlay_for(&self, request: LaunchRequest) -> OverlayState {
        debug!("Showing {:?}", request.target);
        let documents = || {
            self.engine
                .library()
                .documents()
                .into_iter()
                .map(|d| Choice::new(format!("{} ({})", d.name, d.id), d.id))
                .collect::<Vec<_>>()
        };

        match request.target {
            LaunchTarget::ChooseDocument => {
                OverlayState::new(request, "Choose document").with_choices(documents())
            }
            LaunchTarget::Search => {
                let name = request.args["name"].as_str().unwrap_or("this document").to_string();
                OverlayState::new(request, "Search")
                    .with_body(vec![format!("Search {name}"), "Type to search.".to_string()])
            }
            LaunchTarget::Bookmarks => {
                let bookmarks = self.engine.bookmarks();
                let overlay = OverlayState::new(request, "Bookmarks");
                if bookmarks.is_empty() {
                    overlay.with_body(vec!["No bookmarks yet.".to_string()])
                } else {
                    overlay.with_choices(
                        bookmarks.into_iter().map(|b| Choice::new(b.clone(), b)).collect(),
                    )
                }
            }
            LaunchTarget::MyNotes => OverlayState::new(request, "My notes")
                .with_body(vec!["No personal notes.".to_string()]),
            LaunchTarget::MyNoteEdit => {
                let key = request.args["key"].as_str().unwrap_or("this verse").to_string();
                OverlayState::new(request, "My note").with_body(vec![format!("Note for {key}")])
            }
            LaunchTarget::Notes => {
                let lines: Vec<String> = request.args["notes"]
                    .as_array()
                    .map(|notes| {
                        notes
                            .iter()
                            .map(|n| {
                                format!(
                                    "{}: {}",
                                    n["key"].as_str().unwrap_or_default(),
                                    n["text"].as_str().unwrap_or_default()
                                )
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                let lines = if lines.is_empty() {
                    vec!["No notes for this page.".to_string()]
                } else {
                    lines
                };
                OverlayState::new(request, "Notes").with_body(lines)
            }
            LaunchTarget::History => {
                let lines = if self.history.is_empty() {
                    vec!["Nothing read yet.".to_string()]
                } else {
                    self.history.iter().rev().cloned().collect()
                };
                OverlayState::new(request, "History").with_body(lines)
            }
            LaunchTarget::Settings => {
                let on = self.engine.preferences().show_verse_numbers;
                let label = format!("Verse numbers: {}", if on { "on" } else { "off" });
                OverlayState::new(request, "Settings")
                    .with_body(vec!["Enter toggles the highlighted setting.".to_string()])
                    .with_choices(vec![Choice::new(label, "verse_numbers")])
            }
            LaunchTarget::Language => OverlayState::new(request, "Language").with_choices(
                LANGUAGES
                    .iter()
                    .map(|(label, code)| Choice::new(*label, *code))
                    .collect(),
            ),
            LaunchTarget::Download => OverlayState::new(request, "Download")
                .with_body(vec!["Every document is installed. Enter refreshes one.".to_string()])
                .with_choices(documents()),
            LaunchTarget::DocumentManager => OverlayState::new(request, "Manage documents")
                .with_body(vec!["Installed documents:".to_string()])
                .with_choices(documents()),
            LaunchTarget::Help => OverlayState::new(request, "Help").with_body(vec![
                "←/→ or swipe: previous/next page".to_string(),
                "↑/↓, wheel, drag: scroll".to_string(),
                "Space or tap bottom edge: page down".to_string(),
                "m menu  c verse menu  / search  f full screen  q quit".to_string(),
            ]),
        }
    }

    fn finish_overlay(&mut self, overlay: OverlayState, outcome: OverlayResult) {
        let request = overlay.request;
        if outcome.result == ResultCode::Ok {
            self.apply_choice(request.target, outcome.choice.as_deref());
        }

        let payload = json!({ "target": request.target, "choice": outcome.choice });
        let effects = self
            .screen
            .on_activity_result(request.request_code, outcome.result, &payload);
        if effects.contains(Effect::Restart) {
            self.restart();
        }
    }

    fn apply_choice(&mut self, target: LaunchTarget, choice: Option<&str>) {
        match (target, choice) {
            (LaunchTarget::ChooseDocument, Some(id)) => {
                self.engine.open_document(id);
            }
            (LaunchTarget::Settings, Some(_)) => {
                let current = self.engine.preferences();
                self.engine.set_preferences(Preferences {
                    show_verse_numbers: !current.show_verse_numbers,
                });
            }
            (LaunchTarget::Language, Some(code)) => {
                info!("Language set to {}", code);
                self.tui.status = format!("Language: {code}");
            }
            (LaunchTarget::Download, Some(id)) => {
                self.tui.status = format!("{id} is up to date");
            }
            (LaunchTarget::DocumentManager, Some(id)) => {
                self.tui.status = format!("{id} is installed");
            }
            _ => {}
        }
    }

    fn restart(&mut self) {
        info!("Recreating main screen");
        self.screen.pump();
        self.screen.on_pause();
        self.screen = build_screen(
            &self.engine,
            &self.launcher,
            &self.stores,
            self.gestures,
            self.rows,
        );
        self.screen.create();
    }
}

fn build_screen(
    engine: &Arc<ReaderEngine>,
    launcher: &Arc<TuiLauncher>,
    stores: &StateStores,
    gestures: GestureConfig,
    rows: u16,
) -> MainScreen {
    let launcher: Arc<dyn Launcher> = launcher.clone();
    let collaborators = Collaborators::from_engine(engine.clone(), launcher);
    let screen = MainScreen::new(collaborators, stores.open(), gestures, screen_height(rows));
    engine.attach(screen.notifier());
    screen
}
