//! Spaces management grid — headless page controller.
//!
//! DESIGN
//! ======
//! The page lists spaces from a [`SpacesManager`], lets the user pick one
//! for deletion behind a confirmation modal, and reports outcomes through a
//! [`Notifier`]. Table rendering, search and pagination belong to the UI
//! layer; this module owns the state transitions and the per-row column
//! values.
//!
//! ERROR HANDLING
//! ==============
//! Manager failures never escape. A failed load is recorded on the state; a
//! failed delete raises a danger notification. Either way the page ends in
//! a consistent state: loading cleared, confirmation modal closed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ErrorCode;

pub const DEFAULT_SPACE_ID: &str = "default";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SpacesError {
    #[error("space request failed: {message}")]
    Request { message: String },
    #[error("space not found: {0}")]
    NotFound(String),
}

impl SpacesError {
    /// Text shown to the user in notifications.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Request { message } => message.clone(),
            Self::NotFound(id) => format!("space {id} not found"),
        }
    }
}

impl ErrorCode for SpacesError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request { .. } => "E_SPACES_REQUEST",
            Self::NotFound(_) => "E_SPACE_NOT_FOUND",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub initials: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub disabled_features: Vec<String>,
    #[serde(default, rename = "_reserved")]
    pub reserved: bool,
}

impl Space {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            initials: None,
            color: None,
            disabled_features: Vec::new(),
            reserved: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub name: String,
}

/// How many features a space leaves visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureVisibility {
    All,
    None,
    Some { enabled: usize, total: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageView {
    Unauthorized,
    Grid,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridState {
    pub spaces: Vec<Space>,
    pub loading: bool,
    pub show_confirm_delete_modal: bool,
    pub selected_space: Option<Space>,
    pub error: Option<String>,
}

// =============================================================================
// COLLABORATORS
// =============================================================================

#[async_trait::async_trait]
pub trait SpacesManager: Send + Sync {
    async fn get_spaces(&self) -> Result<Vec<Space>, SpacesError>;

    async fn delete_space(&self, space: &Space) -> Result<(), SpacesError>;
}

/// Transient user-visible notifications (toasts).
pub trait Notifier: Send + Sync {
    fn add_success(&self, message: &str);

    fn add_danger(&self, message: &str);
}

/// Navigation control that caches the list of spaces.
pub trait SpacesNavState: Send + Sync {
    fn refresh_spaces_list(&self);
}

// =============================================================================
// COLUMN HELPERS
// =============================================================================

/// Features `space` leaves enabled.
#[must_use]
pub fn enabled_features<'a>(features: &'a [Feature], space: &Space) -> Vec<&'a Feature> {
    features
        .iter()
        .filter(|f| !space.disabled_features.contains(&f.id))
        .collect()
}

#[must_use]
pub fn feature_visibility(features: &[Feature], space: &Space) -> FeatureVisibility {
    let enabled = enabled_features(features, space).len();
    let total = features.len();
    if enabled == total {
        FeatureVisibility::All
    } else if enabled == 0 {
        FeatureVisibility::None
    } else {
        FeatureVisibility::Some { enabled, total }
    }
}

/// Identifier column text; the default space shows nothing.
#[must_use]
pub fn identifier_label(space: &Space) -> &str {
    if space.id == DEFAULT_SPACE_ID { "" } else { &space.id }
}

/// Reserved spaces cannot be deleted.
#[must_use]
pub fn delete_available(space: &Space) -> bool {
    !space.reserved
}

// =============================================================================
// PAGE
// =============================================================================

pub struct SpacesGridPage {
    manager: Arc<dyn SpacesManager>,
    notifier: Arc<dyn Notifier>,
    nav: Arc<dyn SpacesNavState>,
    features: Vec<Feature>,
    can_manage: bool,
    state: Mutex<GridState>,
}

impl SpacesGridPage {
    #[must_use]
    pub fn new(
        manager: Arc<dyn SpacesManager>,
        notifier: Arc<dyn Notifier>,
        nav: Arc<dyn SpacesNavState>,
        features: Vec<Feature>,
        can_manage: bool,
    ) -> Self {
        Self {
            manager,
            notifier,
            nav,
            features,
            can_manage,
            state: Mutex::new(GridState { loading: true, ..GridState::default() }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GridState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn state(&self) -> GridState {
        self.lock().clone()
    }

    #[must_use]
    pub fn page_view(&self) -> PageView {
        if self.can_manage { PageView::Grid } else { PageView::Unauthorized }
    }

    #[must_use]
    pub fn feature_visibility(&self, space: &Space) -> FeatureVisibility {
        feature_visibility(&self.features, space)
    }

    /// Space awaiting confirmation, if the modal is showing.
    #[must_use]
    pub fn confirm_delete_target(&self) -> Option<Space> {
        let state = self.lock();
        if state.show_confirm_delete_modal { state.selected_space.clone() } else { None }
    }

    /// Reload spaces from the manager.
    pub async fn load_grid(&self) {
        {
            let mut state = self.lock();
            state.loading = true;
            state.spaces.clear();
        }

        let result = self.manager.get_spaces().await;
        let mut state = self.lock();
        state.loading = false;
        match result {
            Ok(spaces) => {
                info!(count = spaces.len(), "spaces loaded");
                state.spaces = spaces;
                state.error = None;
            }
            Err(e) => {
                warn!(code = e.error_code(), error = %e, "failed to load spaces");
                state.error = Some(e.to_string());
            }
        }
    }

    pub fn on_delete_space_click(&self, space: Space) {
        let mut state = self.lock();
        state.selected_space = Some(space);
        state.show_confirm_delete_modal = true;
    }

    pub fn cancel_delete(&self) {
        let mut state = self.lock();
        state.show_confirm_delete_modal = false;
        state.selected_space = None;
    }

    /// Delete the space awaiting confirmation, notify, close the modal and
    /// reload. Does nothing unless the confirm modal is showing.
    pub async fn delete_space(&self) {
        let Some(space) = self.confirm_delete_target() else {
            return;
        };

        match self.manager.delete_space(&space).await {
            Ok(()) => {
                info!(space_id = %space.id, "space deleted");
                self.notifier
                    .add_success(&format!("Deleted \"{}\" space.", space.name));
            }
            Err(e) => {
                warn!(space_id = %space.id, code = e.error_code(), error = %e, "failed to delete space");
                self.notifier
                    .add_danger(&format!("Error deleting space: {}", e.user_message()));
            }
        }

        {
            let mut state = self.lock();
            state.show_confirm_delete_modal = false;
            state.selected_space = None;
        }
        self.load_grid().await;
        self.nav.refresh_spaces_list();
    }
}

#[cfg(test)]
#[path = "spaces_test.rs"]
mod tests;
