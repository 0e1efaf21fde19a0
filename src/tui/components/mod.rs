//! # TUI Components
//!
//! UI components for the terminal main screen.
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: document and page titles, or the progress spinner
//! - `Passage`: the visible page text
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `MenuPopupState`: options and context menus
//! - `OverlayState`: secondary interactions launched by the screen
//!
//! Components receive external data as props, never by reaching into the
//! screen or the engine, so each one can be drawn against a `TestBackend`
//! in isolation.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status line)
//! ├── passage.rs       (Page text)
//! ├── menu_popup.rs    (Options / context menu)
//! └── overlay.rs       (Secondary interactions)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod menu_popup;
pub mod overlay;
pub mod passage;
pub use menu_popup::{MenuEvent, MenuKind, MenuPopup, MenuPopupState};
pub use overlay::{Choice, Overlay, OverlayResult, OverlayState};
pub use passage::Passage;
