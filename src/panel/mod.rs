//! Embeddable panel — hosts one embeddable inside an optional container.
//!
//! DESIGN
//! ======
//! Lifecycle is Unmounted -> Mounted -> TornDown. Mounting subscribes to the
//! container (if any) and then renders the embeddable into the supplied
//! mount point exactly once. Tearing down clears the `mounted` guard while
//! holding the state lock, and notifications re-check the guard under that
//! same lock before writing. A notification already in flight when
//! `unmount` returns therefore cannot touch panel state.
//!
//! Container notifications refresh the cached view mode and title
//! visibility. When either actually changes the panel raises a recompute
//! request instead of rebuilding anything itself; the host polls
//! [`EmbeddablePanel::take_recompute_request`] and reopens the menu.
//!
//! Opening the context menu joins the registry lookup and the local
//! compatibility checks before assembling anything.

pub mod menu;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::actions::panel_actions::{EditPanelAction, PanelOverlays, panel_local_actions};
use crate::actions::{
    Action, ActionContext, ActionError, ActionRegistry, CONTEXT_MENU_TRIGGER, RegistryError, filter_compatible,
};
use crate::config::PanelConfig;
use crate::embeddable::{ChangeCallback, Container, Embeddable, MountPoint, Subscription, ViewMode};
use crate::error::ErrorCode;
use menu::{CloseSignal, ContextMenu, build_context_menu, compose_actions};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("panel {0} is already mounted")]
    AlreadyMounted(String),
    #[error("panel {0} is not mounted")]
    NotMounted(String),
    #[error("panel {0} has been torn down")]
    TornDown(String),
    #[error("action lookup failed: {0}")]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Action(#[from] ActionError),
}

impl ErrorCode for PanelError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyMounted(_) => "E_PANEL_ALREADY_MOUNTED",
            Self::NotMounted(_) => "E_PANEL_NOT_MOUNTED",
            Self::TornDown(_) => "E_PANEL_TORN_DOWN",
            Self::Registry(e) => e.error_code(),
            Self::Action(e) => e.error_code(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Unmounted,
    Mounted,
    TornDown,
}

/// Mutable panel state. Only the panel and its subscription write it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelState {
    pub view_mode: ViewMode,
    pub hide_panel_titles: bool,
    pub focused_panel_index: Option<String>,
    pub recompute_requested: bool,
}

impl PanelState {
    fn from_container(container: Option<&Arc<dyn Container>>) -> Self {
        Self {
            view_mode: container.map_or(ViewMode::Edit, |c| c.view_mode()),
            hide_panel_titles: container.is_some_and(|c| c.hide_panel_titles()),
            focused_panel_index: None,
            recompute_requested: false,
        }
    }
}

/// What the panel header should show right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelHeader {
    pub title: Option<String>,
    pub hide_panel_titles: bool,
    pub is_view_mode: bool,
    pub close_context_menu: bool,
}

/// Injected collaborators shared by every panel of an application.
///
/// `config` supplies the filter options for both the registry lookup and the
/// panel-local checks of every menu this panel opens.
#[derive(Clone)]
pub struct PanelServices {
    pub registry: Arc<dyn ActionRegistry>,
    pub overlays: Arc<dyn PanelOverlays>,
    pub config: PanelConfig,
}

// =============================================================================
// PANEL
// =============================================================================

pub struct EmbeddablePanel {
    embeddable: Arc<dyn Embeddable>,
    container: Option<Arc<dyn Container>>,
    services: PanelServices,
    state: Arc<Mutex<PanelState>>,
    mounted: Arc<AtomicBool>,
    lifecycle: Mutex<Lifecycle>,
    subscription: Mutex<Option<Subscription>>,
    close: CloseSignal,
}

impl EmbeddablePanel {
    #[must_use]
    pub fn new(
        embeddable: Arc<dyn Embeddable>,
        container: Option<Arc<dyn Container>>,
        services: PanelServices,
    ) -> Self {
        let state = PanelState::from_container(container.as_ref());
        Self {
            embeddable,
            container,
            services,
            state: Arc::new(Mutex::new(state)),
            mounted: Arc::new(AtomicBool::new(false)),
            lifecycle: Mutex::new(Lifecycle::Unmounted),
            subscription: Mutex::new(None),
            close: CloseSignal::new(),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn panel_id(&self) -> &str {
        self.embeddable.id()
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        *self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn state(&self) -> PanelState {
        self.lock_state().clone()
    }

    #[must_use]
    pub fn close_signal(&self) -> &CloseSignal {
        &self.close
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Subscribe to the container, then render the embeddable into `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel is already mounted or was torn down.
    pub fn mount(&self, root: &MountPoint) -> Result<(), PanelError> {
        {
            let mut lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
            match *lifecycle {
                Lifecycle::Unmounted => {}
                Lifecycle::Mounted => return Err(PanelError::AlreadyMounted(self.panel_id().to_string())),
                Lifecycle::TornDown => return Err(PanelError::TornDown(self.panel_id().to_string())),
            }
            *lifecycle = Lifecycle::Mounted;
        }

        self.mounted.store(true, Ordering::SeqCst);
        if let Some(container) = &self.container {
            let subscription = container.subscribe_to_changes(self.change_callback(container));
            *self.subscription.lock().unwrap_or_else(PoisonError::into_inner) = Some(subscription);
        }

        self.embeddable.render(root);
        info!(
            panel_id = %self.panel_id(),
            container_id = self.container.as_ref().map(|c| c.id().to_string()),
            "panel mounted"
        );
        Ok(())
    }

    /// Clear the mounted guard and release the container subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel is not currently mounted.
    pub fn unmount(&self) -> Result<(), PanelError> {
        {
            let mut lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
            match *lifecycle {
                Lifecycle::Mounted => {}
                Lifecycle::Unmounted => return Err(PanelError::NotMounted(self.panel_id().to_string())),
                Lifecycle::TornDown => return Err(PanelError::TornDown(self.panel_id().to_string())),
            }
            *lifecycle = Lifecycle::TornDown;
        }

        {
            let _state = self.lock_state();
            self.mounted.store(false, Ordering::SeqCst);
        }
        let subscription = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        info!(panel_id = %self.panel_id(), "panel unmounted");
        Ok(())
    }

    fn change_callback(&self, container: &Arc<dyn Container>) -> ChangeCallback {
        let state = Arc::downgrade(&self.state);
        let mounted = self.mounted.clone();
        let container = Arc::downgrade(container);
        let panel_id = self.panel_id().to_string();

        Arc::new(move || {
            if !mounted.load(Ordering::SeqCst) {
                return;
            }
            let (Some(state), Some(container)) = (state.upgrade(), container.upgrade()) else {
                return;
            };
            let view_mode = container.view_mode();
            let hide_panel_titles = container.hide_panel_titles();

            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if !mounted.load(Ordering::SeqCst) {
                return;
            }
            if state.view_mode != view_mode || state.hide_panel_titles != hide_panel_titles {
                state.view_mode = view_mode;
                state.hide_panel_titles = hide_panel_titles;
                state.recompute_requested = true;
                debug!(%panel_id, ?view_mode, hide_panel_titles, "panel settings changed; menu recompute requested");
            }
        })
    }

    /// Return and clear the pending recompute request.
    pub fn take_recompute_request(&self) -> bool {
        std::mem::take(&mut self.lock_state().recompute_requested)
    }

    // =========================================================================
    // FOCUS
    // =========================================================================

    pub fn on_focus(&self, panel_index: impl Into<String>) {
        self.lock_state().focused_panel_index = Some(panel_index.into());
    }

    /// Clear focus, but only if `panel_index` is the one currently focused.
    pub fn on_blur(&self, panel_index: &str) {
        let mut state = self.lock_state();
        if state.focused_panel_index.as_deref() == Some(panel_index) {
            state.focused_panel_index = None;
        }
    }

    // =========================================================================
    // HEADER
    // =========================================================================

    #[must_use]
    pub fn is_view_mode(&self) -> bool {
        self.lock_state().view_mode == ViewMode::View
    }

    #[must_use]
    pub fn header(&self) -> PanelHeader {
        let state = self.state();
        let title = self
            .container
            .as_ref()
            .and_then(|c| c.panel_title(self.panel_id()))
            .or_else(|| self.embeddable.title());
        PanelHeader {
            title,
            hide_panel_titles: state.hide_panel_titles,
            is_view_mode: state.view_mode == ViewMode::View,
            close_context_menu: self.close.is_forced_closed(),
        }
    }

    // =========================================================================
    // CONTEXT MENU
    // =========================================================================

    #[must_use]
    pub fn action_context(&self) -> ActionContext {
        let ctx = ActionContext::new(self.embeddable.clone());
        match &self.container {
            Some(container) => ctx.with_container(container.clone()),
            None => ctx,
        }
    }

    /// Build the context menu: registry actions and compatible local actions
    /// plus the edit action, sorted by descending priority.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry lookup fails or, under a strict
    /// compatibility policy, if any local predicate fails.
    pub async fn open_context_menu(&self) -> Result<ContextMenu, PanelError> {
        let ctx = self.action_context();
        let overlays = &self.services.overlays;
        let options = self.services.config.filter_options();

        let (external, local) = futures::join!(
            self.services
                .registry
                .actions_for_trigger(CONTEXT_MENU_TRIGGER, &ctx, options),
            filter_compatible(panel_local_actions(overlays), &ctx, options),
        );
        let external = external?;
        let local = local?;

        let synthetic: Arc<dyn Action> = Arc::new(EditPanelAction::new(overlays.clone()));
        debug!(
            panel_id = %self.panel_id(),
            external = external.len(),
            local = local.len(),
            "assembling context menu"
        );
        let sorted = compose_actions(synthetic, external, local);
        Ok(build_context_menu(&self.services.config.menu_title, sorted, &ctx, &self.close))
    }
}

impl Drop for EmbeddablePanel {
    fn drop(&mut self) {
        let _state = self.lock_state();
        self.mounted.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
