//! Action capability trait, its context, and errors.
//!
//! Registry-supplied actions and panel-local actions are distinct structs
//! implementing the same [`Action`] trait; the menu assembler never needs
//! to know which is which.

use std::sync::Arc;

use crate::embeddable::{Container, Embeddable, ViewMode};
use crate::error::ErrorCode;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while checking or executing an action.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// An `is_compatible` predicate could not be evaluated.
    #[error("compatibility check failed for action {action_id}: {message}")]
    Compatibility { action_id: String, message: String },

    /// An `is_compatible` predicate did not resolve within the configured limit.
    #[error("compatibility check for action {action_id} timed out after {timeout_ms}ms")]
    CompatibilityTimeout { action_id: String, timeout_ms: u64 },

    /// The action's effect failed.
    #[error("action {action_id} failed: {message}")]
    Execute { action_id: String, message: String },

    /// The action needs a parent container but the context has none.
    #[error("action {action_id} requires a container")]
    MissingContainer { action_id: String },

    /// The container no longer holds the panel the action targets.
    #[error("panel not found in container: {0}")]
    PanelNotFound(String),
}

impl ErrorCode for ActionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Compatibility { .. } => "E_ACTION_COMPATIBILITY",
            Self::CompatibilityTimeout { .. } => "E_ACTION_COMPATIBILITY_TIMEOUT",
            Self::Execute { .. } => "E_ACTION_EXECUTE",
            Self::MissingContainer { .. } => "E_ACTION_MISSING_CONTAINER",
            Self::PanelNotFound(_) => "E_PANEL_NOT_FOUND",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::CompatibilityTimeout { .. })
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Bundle handed to every action predicate and effect.
#[derive(Clone)]
pub struct ActionContext {
    pub embeddable: Arc<dyn Embeddable>,
    pub container: Option<Arc<dyn Container>>,
}

impl ActionContext {
    #[must_use]
    pub fn new(embeddable: Arc<dyn Embeddable>) -> Self {
        Self { embeddable, container: None }
    }

    #[must_use]
    pub fn with_container(mut self, container: Arc<dyn Container>) -> Self {
        self.container = Some(container);
        self
    }

    /// View mode of the parent container; `Edit` when there is none.
    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        self.container
            .as_ref()
            .map_or(ViewMode::Edit, |c| c.view_mode())
    }

    /// True when a container is present and it is in edit mode.
    #[must_use]
    pub fn is_editing_in_container(&self) -> bool {
        self.container
            .as_ref()
            .is_some_and(|c| c.view_mode() == ViewMode::Edit)
    }
}

impl std::fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionContext")
            .field("embeddable", &self.embeddable.id())
            .field("container", &self.container.as_ref().map(|c| c.id().to_string()))
            .finish()
    }
}

// =============================================================================
// ACTION
// =============================================================================

/// A user-invokable operation on an embeddable.
#[async_trait::async_trait]
pub trait Action: Send + Sync {
    fn id(&self) -> &str;

    /// Higher priorities sort first in menus.
    fn priority(&self) -> i32 {
        0
    }

    /// Whether this action applies to `ctx`.
    ///
    /// # Errors
    ///
    /// Returns an error if applicability cannot be determined.
    async fn is_compatible(&self, ctx: &ActionContext) -> Result<bool, ActionError>;

    /// Run the action's effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the effect fails.
    async fn execute(&self, ctx: &ActionContext) -> Result<(), ActionError>;

    /// Display label resolved against `ctx`.
    fn title(&self, ctx: &ActionContext) -> String;

    /// Icon type resolved against `ctx`.
    fn icon(&self, _ctx: &ActionContext) -> Option<String> {
        None
    }
}
