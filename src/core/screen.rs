//! # Main Screen
//!
//! The only surface the application shell drives. Each method is one shell
//! entry point: lifecycle (create, configuration change, pause), secondary
//! interaction results, key presses, menus and raw touches.
//!
//! `MainScreen` must live on the UI thread. Background work reports back
//! through [`MainScreen::notifier`] and becomes visible on the next
//! [`MainScreen::pump`].

use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;

use crate::core::collaborators::{
    BookmarkProvider, ContentRenderer, CurrentPageProvider, Launcher, PageControlProvider,
    SearchProvider,
};
use crate::core::command::{CommandRouter, KeyCode};
use crate::core::coordinator::{ChangeNotifier, Chrome, PageCoordinator};
use crate::core::gesture::{Gesture, GestureConfig, GestureInterpreter, TouchEvent};
use crate::core::menu::{Command, CommandId, CommandOrigin, Menu};
use crate::core::navigation::{NavigationState, NavigationStateStore};
use crate::core::result::{Effect, EffectSet, RequestCode, ResultCode, ResultRouter};
use crate::core::store::KeyValueStore;

/// Collaborators injected into the screen.
#[derive(Clone)]
pub struct Collaborators {
    pub renderer: Arc<dyn ContentRenderer>,
    pub pages: Arc<dyn CurrentPageProvider>,
    pub control: Arc<dyn PageControlProvider>,
    pub search: Arc<dyn SearchProvider>,
    pub bookmarks: Arc<dyn BookmarkProvider>,
    pub launcher: Arc<dyn Launcher>,
}

impl Collaborators {
    /// All roles played by one object, as the demo engine and test fakes do.
    pub fn from_engine<E>(engine: Arc<E>, launcher: Arc<dyn Launcher>) -> Self
    where
        E: ContentRenderer
            + CurrentPageProvider
            + PageControlProvider
            + SearchProvider
            + BookmarkProvider
            + 'static,
    {
        Self {
            renderer: engine.clone(),
            pages: engine.clone(),
            control: engine.clone(),
            search: engine.clone(),
            bookmarks: engine,
            launcher,
        }
    }
}

pub struct MainScreen {
    coordinator: PageCoordinator,
    commands: CommandRouter,
    results: ResultRouter,
    gestures: GestureInterpreter,
    state_store: NavigationStateStore,
    renderer: Arc<dyn ContentRenderer>,
    pages: Arc<dyn CurrentPageProvider>,
    created: bool,
}

impl MainScreen {
    pub fn new(
        collaborators: Collaborators,
        store: Box<dyn KeyValueStore>,
        gesture_config: GestureConfig,
        screen_height: f32,
    ) -> Self {
        let Collaborators {
            renderer,
            pages,
            control,
            search,
            bookmarks,
            launcher,
        } = collaborators;
        Self {
            coordinator: PageCoordinator::new(pages.clone(), control.clone(), renderer.clone()),
            commands: CommandRouter::new(
                pages.clone(),
                control,
                renderer.clone(),
                search,
                bookmarks,
                launcher,
            ),
            results: ResultRouter::new(),
            gestures: GestureInterpreter::new(gesture_config, screen_height),
            state_store: NavigationStateStore::new(store),
            renderer,
            pages,
            created: false,
        }
    }

    pub fn notifier(&self) -> ChangeNotifier {
        self.coordinator.notifier()
    }

    pub fn chrome(&self) -> &Chrome {
        self.coordinator.chrome()
    }

    /// Drains queued change notifications. Call once per UI loop iteration.
    pub fn pump(&mut self) -> usize {
        self.coordinator.pump()
    }

    /// Restores the last navigation state and shows the resulting page.
    pub fn create(&mut self) {
        if self.created {
            warn!("Main screen already created, ignoring");
            return;
        }
        self.created = true;
        info!("Creating main screen");

        let state = self.state_store.restore();
        if !state.is_empty() {
            self.pages.restore_state(&state);
        }
        self.coordinator.show_current_page();
    }

    pub fn on_configuration_changed(&mut self, screen_height: f32) {
        self.gestures.set_screen_height(screen_height);
        // Verse offsets move with the layout; other pages would jump to the top
        if self.pages.current().is_single_key() {
            self.renderer.update_text(true);
        }
    }

    pub fn on_pause(&mut self) {
        let page = self.pages.current();
        let state = NavigationState::new(
            page.current_document().map(|d| d.id.clone()),
            page.key().map(str::to_string),
            self.scroll_ratio(),
        );
        self.state_store.save(&state);
    }

    /// Fraction of the page scrolled past.
    fn scroll_ratio(&self) -> f32 {
        let height = self.renderer.content_height();
        if height == 0 {
            return 0.0;
        }
        self.renderer.scroll_position() as f32 / height as f32
    }

    /// Applies the follow-up effects of a finished secondary interaction.
    /// `Restart` is returned for the shell to act on.
    pub fn on_activity_result(
        &mut self,
        request: RequestCode,
        result: ResultCode,
        payload: &Value,
    ) -> EffectSet {
        let effects = self.results.route(request, result, payload);
        for effect in effects.iter() {
            match effect {
                Effect::Restart => info!("Restart requested by {:?}", request),
                Effect::RefreshDisplay => self.coordinator.refresh_display(),
                Effect::DocumentListChanged => self.coordinator.refresh_suggested_documents(),
            }
        }
        effects
    }

    pub fn on_key_up(&mut self, key: KeyCode) -> bool {
        debug!("Key up: {:?}", key);
        self.commands.handle_key(key)
    }

    pub fn create_options_menu(&self, base: Menu) -> Menu {
        base
    }

    /// Always true: the menu is always shown.
    pub fn prepare_options_menu(&self, menu: &mut Menu) -> bool {
        self.commands.prepare_options_menu(menu);
        true
    }

    pub fn on_options_item_selected(&mut self, id: CommandId) -> bool {
        let command = Command::new(id, CommandOrigin::OptionsMenu);
        self.commands.dispatch(command) || self.coordinator.handle_default_command(id)
    }

    pub fn create_context_menu(&self, base: Menu) -> Menu {
        let mut menu = base;
        self.commands.build_context_menu(&mut menu);
        menu
    }

    pub fn on_context_item_selected(&mut self, id: CommandId) -> bool {
        self.commands.dispatch(Command::new(id, CommandOrigin::ContextMenu))
    }

    /// Classifies the event, forwards it to the content view, then acts on
    /// any recognised gesture.
    pub fn dispatch_touch(&mut self, event: &TouchEvent) -> Option<Gesture> {
        let gesture = self.gestures.observe(event);
        self.renderer.on_touch(event);

        match gesture {
            Some(Gesture::SwipeLeft) => {
                self.commands.handle_key(KeyCode::Right);
            }
            Some(Gesture::SwipeRight) => {
                self.commands.handle_key(KeyCode::Left);
            }
            Some(Gesture::TapBottomBand) => self.renderer.page_down(),
            None => {}
        }
        gesture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gesture::TouchPhase;
    use crate::core::page::{CurrentPage, PageKind};
    use crate::core::store::MemoryStore;
    use crate::test_support::FakeEngine;
    use serde_json::json;

    fn screen(engine: &Arc<FakeEngine>) -> MainScreen {
        screen_with_store(engine, MemoryStore::new())
    }

    fn screen_with_store(engine: &Arc<FakeEngine>, store: MemoryStore) -> MainScreen {
        MainScreen::new(
            Collaborators::from_engine(engine.clone(), engine.clone()),
            Box::new(store),
            GestureConfig::default(),
            1000.0,
        )
    }

    fn context_base() -> Menu {
        Menu::new()
            .with(CommandId::Notes, "Notes")
            .with(CommandId::AddBookmark, "Bookmark verse")
            .with(CommandId::MyNoteAddEdit, "My note")
            .with(CommandId::Copy, "Copy")
            .with(CommandId::ShareVerse, "Share")
            .with(CommandId::SelectText, "Select text")
    }

    #[test]
    fn test_create_shows_current_page() {
        let engine = FakeEngine::bible();
        let mut screen = screen(&engine);
        screen.create();
        assert!(screen.chrome().title_visible);
        assert_eq!(screen.chrome().document_title, "King James Version");
        assert_eq!(screen.chrome().page_title, "Genesis 1:1");
        assert!(engine.restored().is_none());
    }

    #[test]
    fn test_pause_then_create_restores_once() {
        let store = MemoryStore::new();
        let engine = FakeEngine::bible();
        engine.set_key("Psalm 23");
        engine.set_scroll(250, 1000);

        let mut first = screen_with_store(&engine, store.clone());
        first.create();
        first.on_pause();

        let fresh = FakeEngine::bible();
        let mut second = screen_with_store(&fresh, store);
        second.create();
        second.create();

        let restored = fresh.restored().unwrap();
        assert_eq!(restored.document_id.as_deref(), Some("KJV"));
        assert_eq!(restored.key.as_deref(), Some("Psalm 23"));
        assert_eq!(restored.scroll_anchor, 0.25);
        assert_eq!(fresh.restore_calls(), 1);
    }

    #[test]
    fn test_create_survives_corrupt_state() {
        let engine = FakeEngine::bible();
        let mut store = MemoryStore::new();
        store.set("navigation_state", "\u{0}garbage").unwrap();
        let mut screen = screen_with_store(&engine, store);
        screen.create();
        assert!(engine.restored().is_none());
        assert!(screen.chrome().title_visible);
    }

    #[test]
    fn test_configuration_change_recalculates_verse_pages_only() {
        let engine = FakeEngine::bible();
        let mut screen = screen(&engine);
        screen.on_configuration_changed(800.0);
        assert_eq!(engine.forced_updates(), 1);

        engine.set_page(CurrentPage::new(PageKind::GeneralBook).with_key("Part 1"));
        screen.on_configuration_changed(600.0);
        assert_eq!(engine.forced_updates(), 1);
    }

    #[test]
    fn test_settings_result_refreshes_display_and_documents() {
        let engine = FakeEngine::bible();
        let mut screen = screen(&engine);
        let effects = screen.on_activity_result(RequestCode::Settings, ResultCode::Ok, &Value::Null);
        assert!(effects.contains(Effect::RefreshDisplay));
        assert_eq!(engine.preference_applies(), 1);
        assert_eq!(engine.forced_updates(), 1);
        assert_eq!(screen.chrome().suggested_documents.len(), 1);
    }

    #[test]
    fn test_download_result_only_refreshes_documents() {
        let engine = FakeEngine::bible();
        let mut screen = screen(&engine);
        let effects =
            screen.on_activity_result(RequestCode::Download, ResultCode::Ok, &json!({"id": "ESV"}));
        assert_eq!(effects.len(), 1);
        assert_eq!(engine.preference_applies(), 0);
        assert_eq!(screen.chrome().suggested_documents.len(), 1);
    }

    #[test]
    fn test_language_result_returns_restart() {
        let engine = FakeEngine::bible();
        let mut screen = screen(&engine);
        let effects =
            screen.on_activity_result(RequestCode::Language, ResultCode::Ok, &Value::Null);
        assert!(effects.contains(Effect::Restart));
        assert_eq!(engine.forced_updates(), 1);
    }

    #[test]
    fn test_options_selection_falls_back_to_chrome_default() {
        let engine = FakeEngine::bible();
        let mut screen = screen(&engine);
        assert!(screen.on_options_item_selected(CommandId::ToggleFullScreen));
        assert!(screen.chrome().full_screen);
        assert!(!screen.on_options_item_selected(CommandId::SelectText));
        assert!(screen.on_options_item_selected(CommandId::Help));
    }

    #[test]
    fn test_selection_routed_by_originating_menu() {
        let engine = FakeEngine::bible();
        let mut screen = screen(&engine);
        assert!(!screen.on_options_item_selected(CommandId::Copy));
        assert_eq!(engine.copies(), 0);
        assert!(screen.on_context_item_selected(CommandId::Copy));
        assert_eq!(engine.copies(), 1);
        assert!(!screen.on_context_item_selected(CommandId::Help));
    }

    #[test]
    fn test_prepare_options_menu_gates_search() {
        let engine = FakeEngine::bible();
        let screen = screen(&engine);
        let mut menu = screen.create_options_menu(Menu::new().with(CommandId::Search, "Search"));
        assert!(screen.prepare_options_menu(&mut menu));
        assert!(menu.shows(CommandId::Search));

        engine.set_page(CurrentPage::new(PageKind::Search).with_document(engine.document()));
        assert!(screen.prepare_options_menu(&mut menu));
        assert!(!menu.shows(CommandId::Search));
    }

    #[test]
    fn test_context_menu_gated_by_page() {
        let engine = FakeEngine::bible();
        let mut screen = screen(&engine);
        assert_eq!(screen.create_context_menu(context_base()), context_base());

        engine.set_page(CurrentPage::new(PageKind::Dictionary).with_key("Logos"));
        let menu = screen.create_context_menu(context_base());
        assert!(menu.get(CommandId::AddBookmark).is_none());
        assert!(menu.get(CommandId::MyNoteAddEdit).is_none());
        assert!(screen.on_context_item_selected(CommandId::Copy));
    }

    #[test]
    fn test_every_touch_reaches_content_view() {
        let engine = FakeEngine::bible();
        let mut screen = screen(&engine);
        let events = [
            TouchEvent::new(TouchPhase::Press, 500.0, 400.0, 0),
            TouchEvent::new(TouchPhase::Move, 350.0, 400.0, 40),
            TouchEvent::new(TouchPhase::Release, 200.0, 400.0, 80),
            TouchEvent::new(TouchPhase::Press, 300.0, 500.0, 200),
            TouchEvent::new(TouchPhase::Release, 300.0, 500.0, 260),
            TouchEvent::new(TouchPhase::Press, 300.0, 980.0, 400),
            TouchEvent::new(TouchPhase::Release, 300.0, 980.0, 450),
        ];
        let gestures: Vec<_> = events.iter().filter_map(|e| screen.dispatch_touch(e)).collect();

        assert_eq!(engine.touches(), events.to_vec());
        assert_eq!(gestures, vec![Gesture::SwipeLeft, Gesture::TapBottomBand]);
        assert_eq!(engine.page_moves(), (1, 0));
        assert_eq!(engine.page_downs(), 1);
    }

    #[test]
    fn test_search_key_scenario() {
        let engine = FakeEngine::bible();
        let mut screen = screen(&engine);
        assert!(screen.on_key_up(KeyCode::Search));
        assert_eq!(engine.launches().len(), 1);

        engine.set_search_available(false);
        assert!(screen.on_key_up(KeyCode::Search));
        assert_eq!(engine.launches().len(), 1);
    }
}
