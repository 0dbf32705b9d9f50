//! Trigger-bound action registry.
//!
//! DESIGN
//! ======
//! The registry is an explicitly constructed handle passed to whoever needs
//! it; there is no process-wide instance. Actions are registered once by id
//! and then attached to any number of triggers. A lookup resolves the
//! attached actions in attach order and filters them for applicability, so
//! callers receive only actions that already apply to their context. The
//! caller supplies the filter options on every lookup, so one panel config
//! governs both registry and panel-local checks.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use super::filter::{FilterOptions, filter_compatible};
use super::types::{Action, ActionContext, ActionError};
use crate::error::ErrorCode;

/// Trigger fired when a panel's context menu opens.
pub const CONTEXT_MENU_TRIGGER: &str = "CONTEXT_MENU_TRIGGER";

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("action not found: {0}")]
    ActionNotFound(String),
    #[error("action already registered: {0}")]
    DuplicateAction(String),
    #[error(transparent)]
    Action(#[from] ActionError),
}

impl ErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ActionNotFound(_) => "E_ACTION_NOT_FOUND",
            Self::DuplicateAction(_) => "E_ACTION_DUPLICATE",
            Self::Action(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Action(e) if e.retryable())
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Source of trigger-bound actions. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ActionRegistry: Send + Sync {
    /// Actions attached to `trigger_id` that apply to `ctx`, filtered with `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if applicability checks fail under a strict policy.
    async fn actions_for_trigger(
        &self,
        trigger_id: &str,
        ctx: &ActionContext,
        options: FilterOptions,
    ) -> Result<Vec<Arc<dyn Action>>, RegistryError>;
}

// =============================================================================
// IN-MEMORY REGISTRY
// =============================================================================

#[derive(Default)]
pub struct InMemoryActionRegistry {
    actions: RwLock<HashMap<String, Arc<dyn Action>>>,
    /// Trigger id -> attached action ids, in attach order.
    triggers: RwLock<HashMap<String, Vec<String>>>,
}

impl InMemoryActionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action under its own id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateAction`] if the id is taken.
    pub async fn register_action(&self, action: Arc<dyn Action>) -> Result<(), RegistryError> {
        let mut actions = self.actions.write().await;
        let id = action.id().to_string();
        if actions.contains_key(&id) {
            return Err(RegistryError::DuplicateAction(id));
        }
        info!(action_id = %id, "action registered");
        actions.insert(id, action);
        Ok(())
    }

    /// Remove an action and detach it from every trigger.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ActionNotFound`] if nothing is registered under `action_id`.
    pub async fn unregister_action(&self, action_id: &str) -> Result<(), RegistryError> {
        if self.actions.write().await.remove(action_id).is_none() {
            return Err(RegistryError::ActionNotFound(action_id.to_string()));
        }
        let mut triggers = self.triggers.write().await;
        for attached in triggers.values_mut() {
            attached.retain(|id| id != action_id);
        }
        info!(%action_id, "action unregistered");
        Ok(())
    }

    /// Attach a registered action to a trigger. Attaching twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::ActionNotFound`] if the action is not registered.
    pub async fn attach_action(&self, trigger_id: &str, action_id: &str) -> Result<(), RegistryError> {
        if !self.actions.read().await.contains_key(action_id) {
            return Err(RegistryError::ActionNotFound(action_id.to_string()));
        }
        let mut triggers = self.triggers.write().await;
        let attached = triggers.entry(trigger_id.to_string()).or_default();
        if !attached.iter().any(|id| id == action_id) {
            attached.push(action_id.to_string());
        }
        Ok(())
    }

    /// Detach an action from a trigger. Returns whether it was attached.
    pub async fn detach_action(&self, trigger_id: &str, action_id: &str) -> bool {
        let mut triggers = self.triggers.write().await;
        let Some(attached) = triggers.get_mut(trigger_id) else {
            return false;
        };
        let before = attached.len();
        attached.retain(|id| id != action_id);
        before != attached.len()
    }
}

#[async_trait::async_trait]
impl ActionRegistry for InMemoryActionRegistry {
    async fn actions_for_trigger(
        &self,
        trigger_id: &str,
        ctx: &ActionContext,
        options: FilterOptions,
    ) -> Result<Vec<Arc<dyn Action>>, RegistryError> {
        let candidates: Vec<Arc<dyn Action>> = {
            let triggers = self.triggers.read().await;
            let actions = self.actions.read().await;
            triggers
                .get(trigger_id)
                .map(|ids| ids.iter().filter_map(|id| actions.get(id).cloned()).collect())
                .unwrap_or_default()
        };

        let attached = candidates.len();
        let compatible = filter_compatible(candidates, ctx, options).await?;
        debug!(%trigger_id, attached, compatible = compatible.len(), "resolved trigger actions");
        Ok(compatible)
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
