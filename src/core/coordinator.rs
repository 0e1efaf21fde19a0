//! # Page Coordinator
//!
//! Owns the chrome (titles, progress indicator, full-screen flag, suggested
//! documents) and is the only thing that mutates it.
//!
//! The content engine reports page changes through a [`ChangeNotifier`],
//! which can be cloned into any thread. Notifications land in a FIFO queue
//! and are applied only when the UI thread calls [`PageCoordinator::pump`],
//! so chrome mutation is serialized and always happens in dispatch order.
//!
//! ```text
//!  worker ─┐
//!  worker ─┼─ ChangeNotifier ──► mpsc queue ──► pump() on UI thread ──► Chrome
//!  input  ─┘
//! ```
//!
//! A `Started` that arrives before the previous change's `Completed` has
//! been applied is simply queued behind it. Nothing is dropped or rejected;
//! the last `Completed` applied decides the final chrome.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, warn};

use crate::core::collaborators::{ContentRenderer, CurrentPageProvider, PageControlProvider};
use crate::core::menu::CommandId;
use crate::core::page::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeNotification {
    Started,
    Completed,
    VerseChanged,
}

/// Thread-safe handle for reporting page changes to the coordinator.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: Sender<ChangeNotification>,
}

impl ChangeNotifier {
    pub fn started(&self) {
        self.send(ChangeNotification::Started);
    }

    pub fn completed(&self) {
        self.send(ChangeNotification::Completed);
    }

    pub fn verse_changed(&self) {
        self.send(ChangeNotification::VerseChanged);
    }

    fn send(&self, notification: ChangeNotification) {
        if self.tx.send(notification).is_err() {
            warn!("Dropped {:?}: coordinator is gone", notification);
        }
    }
}

/// Non-content UI surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chrome {
    pub document_title: String,
    pub page_title: String,
    pub title_visible: bool,
    pub progress_visible: bool,
    pub full_screen: bool,
    pub suggested_documents: Vec<Document>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Changing,
}

pub struct PageCoordinator {
    rx: Receiver<ChangeNotification>,
    notifier: ChangeNotifier,
    pages: Arc<dyn CurrentPageProvider>,
    control: Arc<dyn PageControlProvider>,
    renderer: Arc<dyn ContentRenderer>,
    chrome: Chrome,
    phase: Phase,
    page_displayed: bool,
}

impl PageCoordinator {
    pub fn new(
        pages: Arc<dyn CurrentPageProvider>,
        control: Arc<dyn PageControlProvider>,
        renderer: Arc<dyn ContentRenderer>,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rx,
            notifier: ChangeNotifier { tx },
            pages,
            control,
            renderer,
            chrome: Chrome::default(),
            phase: Phase::Idle,
            page_displayed: false,
        }
    }

    pub fn notifier(&self) -> ChangeNotifier {
        self.notifier.clone()
    }

    pub fn chrome(&self) -> &Chrome {
        &self.chrome
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Applies every queued notification in arrival order. Returns how many
    /// were applied so the caller knows whether to redraw.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(notification) = self.rx.try_recv() {
            self.apply(notification);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, notification: ChangeNotification) {
        debug!("Applying {:?} (phase {:?})", notification, self.phase);
        match notification {
            ChangeNotification::Started => self.on_change_started(),
            ChangeNotification::Completed => self.on_change_completed(),
            ChangeNotification::VerseChanged => self.on_verse_changed(),
        }
    }

    fn on_change_started(&mut self) {
        self.phase = Phase::Changing;
        self.chrome.progress_visible = true;
        self.chrome.title_visible = false;
    }

    fn on_change_completed(&mut self) {
        self.phase = Phase::Idle;
        self.chrome.progress_visible = false;
        self.chrome.title_visible = true;

        match self.control.current_document_title() {
            Ok(document_title) => {
                self.chrome.document_title = document_title;
                self.chrome.page_title = self.pages.current().page_title();
                self.page_displayed = true;
                self.refresh_suggested_documents();
            }
            Err(e) => {
                // Previous titles stay on screen
                warn!("Page change failed, keeping previous chrome: {}", e);
            }
        }
    }

    fn on_verse_changed(&mut self) {
        if !self.page_displayed {
            debug!("Verse change ignored: no page displayed yet");
            return;
        }
        self.chrome.page_title = self.pages.current().page_title();
    }

    /// Shows the page that is current right now, as if a change just completed.
    pub fn show_current_page(&mut self) {
        self.on_change_completed();
    }

    pub fn refresh_display(&mut self) {
        self.renderer.apply_preference_settings();
        self.renderer.update_text(true);
    }

    pub fn refresh_suggested_documents(&mut self) {
        self.chrome.suggested_documents = self.control.suggested_documents();
    }

    /// Default chrome handling for commands no document action claimed.
    pub fn handle_default_command(&mut self, id: CommandId) -> bool {
        match id {
            CommandId::ToggleFullScreen => {
                self.chrome.full_screen = !self.chrome.full_screen;
                debug!("Full screen: {}", self.chrome.full_screen);
                true
            }
            _ => false,
        }
    }
}
