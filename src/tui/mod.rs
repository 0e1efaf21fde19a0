//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the chrome and
//! page text, and translates keyboard and mouse events into main-screen
//! entry points.
//!
//! This is the only module that knows about ratatui and crossterm. The
//! screen itself lives in `core` and could be driven by another shell.
//!
//! ## Redraw Strategy
//!
//! - **Loading** (progress indicator visible): draws every ~80ms so the
//!   spinner animates.
//! - **Idle**: sleeps up to 500ms and only redraws on input, resize or a
//!   queued page-change notification.
//!
//! Mouse left-button streams become touch events (one column is
//! [`host::CELL_WIDTH`] units wide, one row [`host::CELL_HEIGHT`] tall), so
//! drags scroll and fast horizontal drags turn pages.

mod component;
mod components;
pub mod event;
pub mod host;
mod ui;

use log::info;
use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use crate::core::config::ResolvedConfig;
use crate::library::{Library, LibrarySource, ReaderEngine};
use crate::tui::event::{poll_event_immediate, poll_event_timeout};
use crate::tui::host::{CELL_HEIGHT, ScreenHost, StateStores};

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, Hide)?;
        info!("Terminal modes enabled (mouse capture, hidden cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, Show);
    }
}

/// Builds the demo library engine described by the config.
pub fn build_engine(config: &ResolvedConfig) -> Arc<ReaderEngine> {
    let library = Arc::new(Library::builtin());
    let source = Arc::new(LibrarySource::new(
        library.clone(),
        Duration::from_millis(config.load_delay_ms),
    ));
    Arc::new(ReaderEngine::new(
        library,
        source,
        tokio::runtime::Handle::current(),
        &config.start_document,
        CELL_HEIGHT,
    ))
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let engine = build_engine(&config);
    let stores = StateStores::new(config.state_dir.as_deref());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()?;

    let rows = terminal.size()?.height;
    let mut host = ScreenHost::new(engine, stores, config.gestures, rows);

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        if host.pump() {
            needs_redraw = true;
        }

        let animating = host.screen.chrome().progress_visible;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| {
                ui::draw_ui(
                    f,
                    host.screen.chrome(),
                    &host.engine,
                    &mut host.tui,
                    spinner_frame,
                )
            })?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating, long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if host.handle_event(event) {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            break;
        }
    }

    host.shutdown();
    ratatui::restore();
    Ok(())
}
