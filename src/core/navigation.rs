//! # Navigation State
//!
//! The minimum needed to put the reader back where they were: which
//! document, which key, and how far down the page. Saved when the screen
//! pauses, restored when it is created.
//!
//! Losing this state must never stop the screen from starting, so
//! [`NavigationStateStore::restore`] always yields a state. The error branch
//! is still explicit in [`NavigationStateStore::try_restore`].

use std::fmt;

use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::store::{KeyValueStore, StoreError};

pub(crate) const STATE_KEY: &str = "navigation_state";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationState {
    pub document_id: Option<String>,
    pub key: Option<String>,
    /// Fraction of the page scrolled, `0.0..=1.0`.
    pub scroll_anchor: f32,
    /// Unix seconds of the save.
    pub saved_at: Option<i64>,
}

impl NavigationState {
    pub fn new(document_id: Option<String>, key: Option<String>, scroll_anchor: f32) -> Self {
        Self {
            document_id,
            key,
            scroll_anchor: clamp_anchor(scroll_anchor),
            saved_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.document_id.is_none() && self.key.is_none()
    }
}

fn clamp_anchor(anchor: f32) -> f32 {
    if anchor.is_finite() {
        anchor.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Debug)]
pub enum RestoreError {
    /// Nothing was ever saved.
    Missing,
    Store(StoreError),
    Corrupt(serde_json::Error),
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreError::Missing => write!(f, "no saved navigation state"),
            RestoreError::Store(e) => write!(f, "navigation state unreadable: {e}"),
            RestoreError::Corrupt(e) => write!(f, "navigation state corrupt: {e}"),
        }
    }
}

impl std::error::Error for RestoreError {}

pub struct NavigationStateStore {
    store: Box<dyn KeyValueStore>,
}

impl NavigationStateStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Best effort: failures are logged, never returned.
    pub fn save(&mut self, state: &NavigationState) {
        let mut state = state.clone();
        state.scroll_anchor = clamp_anchor(state.scroll_anchor);
        state.saved_at = Some(Utc::now().timestamp());

        let json = match serde_json::to_string(&state) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize navigation state: {}", e);
                return;
            }
        };
        match self.store.set(STATE_KEY, &json) {
            Ok(()) => info!(
                "Saved navigation state: {:?} {:?} @ {:.2}",
                state.document_id, state.key, state.scroll_anchor
            ),
            Err(e) => warn!("Failed to save navigation state: {}", e),
        }
    }

    pub fn try_restore(&self) -> Result<NavigationState, RestoreError> {
        let json = self
            .store
            .get(STATE_KEY)
            .map_err(RestoreError::Store)?
            .ok_or(RestoreError::Missing)?;
        let mut state: NavigationState =
            serde_json::from_str(&json).map_err(RestoreError::Corrupt)?;
        state.scroll_anchor = clamp_anchor(state.scroll_anchor);
        Ok(state)
    }

    /// Never fails; any error yields the empty state.
    pub fn restore(&self) -> NavigationState {
        match self.try_restore() {
            Ok(state) => {
                info!("Restored navigation state: {:?} {:?}", state.document_id, state.key);
                state
            }
            Err(RestoreError::Missing) => {
                debug!("No navigation state to restore");
                NavigationState::default()
            }
            Err(e) => {
                warn!("Restore error, starting fresh: {}", e);
                NavigationState::default()
            }
        }
    }
}
