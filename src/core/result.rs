//! # Secondary Interaction Results
//!
//! A secondary interaction (search, settings, notes...) is launched with a
//! [`RequestCode`] and eventually comes back with a [`ResultCode`] and an
//! opaque payload. [`ResultRouter::route`] turns that triple into the set of
//! follow-up effects the main screen has to apply.
//!
//! ```text
//! (request, result, payload) → route() → EffectSet ⊆ {Restart, RefreshDisplay, DocumentListChanged}
//! ```

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestCode {
    Standard,
    Search,
    Notes,
    Settings,
    Language,
    Download,
    DocumentManager,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultCode {
    Ok,
    Canceled,
    Other(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Restart,
    RefreshDisplay,
    DocumentListChanged,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Restart => write!(f, "restart"),
            Effect::RefreshDisplay => write!(f, "refresh-display"),
            Effect::DocumentListChanged => write!(f, "document-list-changed"),
        }
    }
}

/// Subset of [`Effect`]. Members are independent flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectSet {
    restart: bool,
    refresh_display: bool,
    document_list_changed: bool,
}

impl EffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, effect: Effect) {
        match effect {
            Effect::Restart => self.restart = true,
            Effect::RefreshDisplay => self.refresh_display = true,
            Effect::DocumentListChanged => self.document_list_changed = true,
        }
    }

    pub fn contains(&self, effect: Effect) -> bool {
        match effect {
            Effect::Restart => self.restart,
            Effect::RefreshDisplay => self.refresh_display,
            Effect::DocumentListChanged => self.document_list_changed,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.restart || self.refresh_display || self.document_list_changed)
    }

    /// Effects in application order: restart, refresh, document list.
    pub fn iter(&self) -> impl Iterator<Item = Effect> + '_ {
        [
            Effect::Restart,
            Effect::RefreshDisplay,
            Effect::DocumentListChanged,
        ]
        .into_iter()
        .filter(|effect| self.contains(*effect))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }
}

impl FromIterator<Effect> for EffectSet {
    fn from_iter<I: IntoIterator<Item = Effect>>(iter: I) -> Self {
        let mut set = EffectSet::new();
        for effect in iter {
            set.insert(effect);
        }
        set
    }
}

#[derive(Debug, Default)]
pub struct ResultRouter;

impl ResultRouter {
    pub fn new() -> Self {
        Self
    }

    pub fn restart_required(&self, request: RequestCode) -> bool {
        request == RequestCode::Language
    }

    pub fn display_refresh_required(&self, request: RequestCode) -> bool {
        request == RequestCode::Settings
    }

    pub fn document_changed(&self, request: RequestCode) -> bool {
        matches!(request, RequestCode::Download | RequestCode::DocumentManager)
    }

    /// Evaluates all three predicates (never short-circuits) and unions them.
    ///
    /// Effects cascade downwards: a restart also refreshes the display, and a
    /// restart or refresh also refreshes the suggested document list. A bare
    /// document change implies neither of the others.
    pub fn route(&self, request: RequestCode, result: ResultCode, payload: &Value) -> EffectSet {
        let restart = self.restart_required(request);
        let refresh = self.display_refresh_required(request);
        let changed = self.document_changed(request);

        let mut effects = EffectSet::new();
        if restart {
            effects.insert(Effect::Restart);
        }
        if restart || refresh {
            effects.insert(Effect::RefreshDisplay);
        }
        if restart || refresh || changed {
            effects.insert(Effect::DocumentListChanged);
        }

        debug!(
            "Routed result {:?}/{:?} (payload: {}) -> {:?}",
            request, result, payload, effects
        );
        effects
    }
}
