//! Context menu assembly.
//!
//! DESIGN
//! ======
//! The synthetic edit action, registry actions and panel-local actions are
//! concatenated in that order and stable-sorted by descending priority, so
//! equal priorities keep their concatenation order. Each action becomes an
//! item whose label and icon are resolved against the context at build
//! time. All items live in one top-level panel with a fixed id.
//!
//! Clicking an item runs the action and then pulses the [`CloseSignal`]:
//! the flag goes `true`, the task yields once so observers can react, and
//! the flag drops back to `false` so the next open renders normally.

use std::cmp::Reverse;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::actions::{Action, ActionContext, ActionError};

/// Id of the single top-level menu panel.
pub const MAIN_MENU_ID: &str = "mainMenu";

// =============================================================================
// CLOSE SIGNAL
// =============================================================================

/// Transient "force the menu closed" flag shared by a panel and its items.
#[derive(Clone, Debug)]
pub struct CloseSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CloseSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CloseSignal {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Observe flag transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn is_forced_closed(&self) -> bool {
        *self.tx.borrow()
    }

    /// Raise the flag, yield one tick, then clear it.
    pub async fn close(&self) {
        self.tx.send_replace(true);
        tokio::task::yield_now().await;
        self.tx.send_replace(false);
    }
}

// =============================================================================
// MENU TYPES
// =============================================================================

/// One clickable menu entry.
pub struct ContextMenuItem {
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
    pub priority: i32,
    action: Arc<dyn Action>,
    context: ActionContext,
    close: CloseSignal,
}

impl ContextMenuItem {
    /// Run the action, then close the menu. The menu closes even when the
    /// action fails; the failure is returned to the caller.
    ///
    /// # Errors
    ///
    /// Returns whatever the action's `execute` returned.
    pub async fn click(&self) -> Result<(), ActionError> {
        debug!(action_id = %self.id, panel_id = self.context.embeddable.id(), "menu item clicked");
        let outcome = self.action.execute(&self.context).await;
        self.close.close().await;
        outcome
    }

    #[must_use]
    pub fn descriptor(&self) -> MenuItemDescriptor {
        MenuItemDescriptor { id: self.id.clone(), name: self.label.clone(), icon: self.icon.clone() }
    }
}

impl std::fmt::Debug for ContextMenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextMenuItem")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct ContextMenuPanel {
    pub id: String,
    pub title: String,
    pub items: Vec<ContextMenuItem>,
}

impl ContextMenuPanel {
    #[must_use]
    pub fn item(&self, id: &str) -> Option<&ContextMenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn descriptor(&self) -> MenuPanelDescriptor {
        MenuPanelDescriptor {
            id: self.id.clone(),
            title: self.title.clone(),
            items: self.items.iter().map(ContextMenuItem::descriptor).collect(),
        }
    }
}

/// Ordered menu panels handed to the rendering layer.
#[derive(Debug)]
pub struct ContextMenu {
    pub panels: Vec<ContextMenuPanel>,
}

impl ContextMenu {
    /// The top-level panel (`mainMenu`).
    #[must_use]
    pub fn main_panel(&self) -> Option<&ContextMenuPanel> {
        self.panels.iter().find(|p| p.id == MAIN_MENU_ID)
    }

    #[must_use]
    pub fn descriptors(&self) -> Vec<MenuPanelDescriptor> {
        self.panels.iter().map(ContextMenuPanel::descriptor).collect()
    }
}

/// Serializable view of a menu panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPanelDescriptor {
    pub id: String,
    pub title: String,
    pub items: Vec<MenuItemDescriptor>,
}

/// Serializable view of a menu item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

// =============================================================================
// ASSEMBLY
// =============================================================================

/// Concatenate synthetic, external, local; stable sort by descending priority.
#[must_use]
pub fn compose_actions(
    synthetic: Arc<dyn Action>,
    external: Vec<Arc<dyn Action>>,
    local: Vec<Arc<dyn Action>>,
) -> Vec<Arc<dyn Action>> {
    let mut all = Vec::with_capacity(1 + external.len() + local.len());
    all.push(synthetic);
    all.extend(external);
    all.extend(local);
    all.sort_by_key(|action| Reverse(action.priority()));
    all
}

/// Wrap already-sorted actions into a single top-level menu panel.
#[must_use]
pub fn build_context_menu(
    title: &str,
    sorted: Vec<Arc<dyn Action>>,
    ctx: &ActionContext,
    close: &CloseSignal,
) -> ContextMenu {
    let items = sorted
        .into_iter()
        .map(|action| ContextMenuItem {
            id: action.id().to_string(),
            label: action.title(ctx),
            icon: action.icon(ctx),
            priority: action.priority(),
            action,
            context: ctx.clone(),
            close: close.clone(),
        })
        .collect();

    ContextMenu {
        panels: vec![ContextMenuPanel { id: MAIN_MENU_ID.to_string(), title: title.to_string(), items }],
    }
}

#[cfg(test)]
#[path = "menu_test.rs"]
mod tests;
