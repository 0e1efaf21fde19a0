//! # Command Router
//!
//! Maps discrete commands (options menu, context menu, key presses) to
//! collaborator calls, and lets the current page gate menu contents.
//!
//! Unmatched commands return `false`. That is not an error: the caller
//! falls back to its default handler, or drops the command.

use std::sync::Arc;

use log::{debug, info};
use serde_json::json;

use crate::core::collaborators::{
    BookmarkProvider, ContentRenderer, CurrentPageProvider, LaunchRequest, LaunchTarget, Launcher,
    PageControlProvider, SearchProvider,
};
use crate::core::menu::{Command, CommandId, CommandOrigin, Menu};
use crate::core::result::RequestCode;

/// Hardware-style key codes delivered on key release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Left,
    Right,
    Search,
    Other(u32),
}

/// Document-action table for the options menu.
const DOCUMENT_ACTIONS: &[(CommandId, LaunchTarget, RequestCode)] = &[
    (CommandId::ChooseDocument, LaunchTarget::ChooseDocument, RequestCode::Standard),
    (CommandId::Bookmarks, LaunchTarget::Bookmarks, RequestCode::Standard),
    (CommandId::MyNotes, LaunchTarget::MyNotes, RequestCode::Standard),
    (CommandId::History, LaunchTarget::History, RequestCode::Standard),
    (CommandId::Settings, LaunchTarget::Settings, RequestCode::Settings),
    (CommandId::Language, LaunchTarget::Language, RequestCode::Language),
    (CommandId::Download, LaunchTarget::Download, RequestCode::Download),
    (
        CommandId::DocumentManager,
        LaunchTarget::DocumentManager,
        RequestCode::DocumentManager,
    ),
    (CommandId::Help, LaunchTarget::Help, RequestCode::Standard),
];

pub struct CommandRouter {
    pages: Arc<dyn CurrentPageProvider>,
    control: Arc<dyn PageControlProvider>,
    renderer: Arc<dyn ContentRenderer>,
    search: Arc<dyn SearchProvider>,
    bookmarks: Arc<dyn BookmarkProvider>,
    launcher: Arc<dyn Launcher>,
}

impl CommandRouter {
    pub fn new(
        pages: Arc<dyn CurrentPageProvider>,
        control: Arc<dyn PageControlProvider>,
        renderer: Arc<dyn ContentRenderer>,
        search: Arc<dyn SearchProvider>,
        bookmarks: Arc<dyn BookmarkProvider>,
        launcher: Arc<dyn Launcher>,
    ) -> Self {
        Self {
            pages,
            control,
            renderer,
            search,
            bookmarks,
            launcher,
        }
    }

    /// Routes by origin: context selections go to the context handler,
    /// everything else to the document-action table.
    pub fn dispatch(&self, command: Command) -> bool {
        match command.origin {
            CommandOrigin::ContextMenu => self.handle_context_selection(command.id),
            CommandOrigin::OptionsMenu | CommandOrigin::KeyPress => self.handle_command(command.id),
        }
    }

    pub fn handle_command(&self, id: CommandId) -> bool {
        if id == CommandId::Search {
            self.launch_search();
            return true;
        }
        match DOCUMENT_ACTIONS.iter().find(|(action, _, _)| *action == id) {
            Some((_, target, request_code)) => {
                self.launch(LaunchRequest::new(*target, *request_code));
                true
            }
            None => {
                debug!("No document action for {:?}", id);
                false
            }
        }
    }

    pub fn handle_key(&self, key: KeyCode) -> bool {
        match key {
            KeyCode::Right => {
                self.control.next_page();
                true
            }
            KeyCode::Left => {
                self.control.previous_page();
                true
            }
            KeyCode::Search if self.pages.current().is_searchable() => {
                self.launch_search();
                true
            }
            _ => false,
        }
    }

    /// Search launch for the current document, if one is available.
    pub fn search_request(&self) -> Option<LaunchRequest> {
        let page = self.pages.current();
        if !page.is_searchable() {
            return None;
        }
        let document = page.current_document()?;
        self.search.search_request_for(document)
    }

    fn launch_search(&self) {
        match self.search_request() {
            Some(request) => self.launch(request),
            None => debug!("Search unavailable for current page"),
        }
    }

    pub fn prepare_options_menu(&self, menu: &mut Menu) {
        self.pages.current().contribute_options_menu(menu);
    }

    pub fn build_context_menu(&self, menu: &mut Menu) {
        self.pages.current().contribute_context_menu(menu);
    }

    pub fn handle_context_selection(&self, id: CommandId) -> bool {
        match id {
            CommandId::Notes => {
                let notes = self.renderer.notes_list();
                self.launch(
                    LaunchRequest::new(LaunchTarget::Notes, RequestCode::Notes)
                        .with_args(json!({ "notes": notes })),
                );
            }
            CommandId::AddBookmark => self.bookmarks.bookmark_current_verse(),
            CommandId::MyNoteAddEdit => {
                let key = self.pages.current().single_key();
                self.launch(
                    LaunchRequest::new(LaunchTarget::MyNoteEdit, RequestCode::Standard)
                        .with_args(json!({ "key": key })),
                );
            }
            CommandId::Copy => self.control.copy_to_clipboard(),
            CommandId::ShareVerse => self.control.share_verse(),
            CommandId::SelectText => self.renderer.select_and_copy_text(),
            _ => return false,
        }
        true
    }

    fn launch(&self, request: LaunchRequest) {
        info!("Launching {:?} ({:?})", request.target, request.request_code);
        self.launcher.launch(request);
    }
}
