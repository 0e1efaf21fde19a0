//! # Core Screen Logic
//!
//! This module contains Lectern's main-screen orchestration.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────────┐
//!                    │            CORE             │
//!                    │        (this module)        │
//!                    │                             │
//!                    │  • MainScreen (entry points)│
//!                    │  • PageCoordinator (chrome) │
//!                    │  • Command/Result routers   │
//!                    │  • GestureInterpreter       │
//!                    │  • NavigationStateStore     │
//!                    └──────────────┬──────────────┘
//!                                   │ collaborator traits
//!            ┌──────────────────────┼──────────────────────┐
//!            ▼                      ▼                      ▼
//!     ┌────────────┐         ┌────────────┐         ┌────────────┐
//!     │    TUI     │         │  Content   │         │   State    │
//!     │  Adapter   │         │  Engine    │         │   Store    │
//!     │ (ratatui)  │         │ (library)  │         │  (files)   │
//!     └────────────┘         └────────────┘         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`screen`]: `MainScreen`, the shell-facing entry points
//! - [`coordinator`]: change notifications and the chrome they drive
//! - [`command`]: menu, context-menu and key routing
//! - [`result`]: secondary-interaction results into follow-up effects
//! - [`gesture`]: touch stream classification
//! - [`navigation`]: resume state save/restore
//! - [`collaborators`]: traits for everything the screen does not own

pub mod collaborators;
pub mod command;
pub mod config;
pub mod coordinator;
pub mod gesture;
pub mod menu;
pub mod navigation;
pub mod page;
pub mod result;
pub mod screen;
pub mod store;

// Re-export commonly used types for convenience
pub use coordinator::{ChangeNotifier, Chrome};
pub use screen::{Collaborators, MainScreen};
