//! Actions every panel offers on its own, independent of the registry.
//!
//! Effects that need a flyout, modal, inspector or editor go through the
//! [`PanelOverlays`] collaborator. Removing a panel and changing its title
//! talk to the container directly.

use std::sync::Arc;

use tracing::info;

use super::types::{Action, ActionContext, ActionError};

pub const CUSTOMIZE_PANEL_ACTION_ID: &str = "CUSTOMIZE_PANEL_ACTION_ID";
pub const ADD_PANEL_ACTION_ID: &str = "ADD_PANEL_ACTION_ID";
pub const INSPECT_PANEL_ACTION_ID: &str = "openInspector";
pub const REMOVE_PANEL_ACTION_ID: &str = "deletePanel";
pub const EDIT_PANEL_ACTION_ID: &str = "editPanel";

// =============================================================================
// OVERLAYS
// =============================================================================

/// Outcome of asking the user for a new panel title.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TitleChoice {
    /// Dialog dismissed; leave the title alone.
    Keep,
    /// Drop any custom title and fall back to the embeddable's own.
    Reset,
    Set(String),
}

/// UI surfaces panel actions open. Implemented by the rendering layer.
#[async_trait::async_trait]
pub trait PanelOverlays: Send + Sync {
    async fn prompt_panel_title(&self, ctx: &ActionContext, current: Option<String>) -> Result<TitleChoice, ActionError>;

    async fn open_add_panel_flyout(&self, ctx: &ActionContext) -> Result<(), ActionError>;

    async fn open_inspector(&self, ctx: &ActionContext, adapters: &[String]) -> Result<(), ActionError>;

    async fn open_editor(&self, ctx: &ActionContext, edit_url: &str) -> Result<(), ActionError>;
}

// =============================================================================
// CUSTOMIZE TITLE
// =============================================================================

pub struct CustomizePanelTitleAction {
    overlays: Arc<dyn PanelOverlays>,
}

impl CustomizePanelTitleAction {
    #[must_use]
    pub fn new(overlays: Arc<dyn PanelOverlays>) -> Self {
        Self { overlays }
    }
}

#[async_trait::async_trait]
impl Action for CustomizePanelTitleAction {
    fn id(&self) -> &str {
        CUSTOMIZE_PANEL_ACTION_ID
    }

    fn priority(&self) -> i32 {
        10
    }

    async fn is_compatible(&self, ctx: &ActionContext) -> Result<bool, ActionError> {
        Ok(ctx.is_editing_in_container())
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<(), ActionError> {
        let container = ctx
            .container
            .as_ref()
            .ok_or_else(|| ActionError::MissingContainer { action_id: self.id().to_string() })?;
        let panel_id = ctx.embeddable.id();
        let current = container.panel_title(panel_id).or_else(|| ctx.embeddable.title());

        match self.overlays.prompt_panel_title(ctx, current).await? {
            TitleChoice::Keep => {}
            TitleChoice::Reset => container.set_panel_title(panel_id, None),
            TitleChoice::Set(title) => {
                info!(%panel_id, %title, "panel title customized");
                container.set_panel_title(panel_id, Some(title));
            }
        }
        Ok(())
    }

    fn title(&self, _ctx: &ActionContext) -> String {
        "Customize panel".into()
    }

    fn icon(&self, _ctx: &ActionContext) -> Option<String> {
        Some("pencil".into())
    }
}

// =============================================================================
// ADD PANEL
// =============================================================================

pub struct AddPanelAction {
    overlays: Arc<dyn PanelOverlays>,
}

impl AddPanelAction {
    #[must_use]
    pub fn new(overlays: Arc<dyn PanelOverlays>) -> Self {
        Self { overlays }
    }
}

#[async_trait::async_trait]
impl Action for AddPanelAction {
    fn id(&self) -> &str {
        ADD_PANEL_ACTION_ID
    }

    fn priority(&self) -> i32 {
        8
    }

    /// Only containers can take new panels, and only while editing.
    async fn is_compatible(&self, ctx: &ActionContext) -> Result<bool, ActionError> {
        Ok(ctx.embeddable.is_container() && ctx.view_mode() == crate::embeddable::ViewMode::Edit)
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<(), ActionError> {
        self.overlays.open_add_panel_flyout(ctx).await
    }

    fn title(&self, _ctx: &ActionContext) -> String {
        "Add panels".into()
    }

    fn icon(&self, _ctx: &ActionContext) -> Option<String> {
        Some("plusInCircleFilled".into())
    }
}

// =============================================================================
// INSPECT
// =============================================================================

pub struct InspectPanelAction {
    overlays: Arc<dyn PanelOverlays>,
}

impl InspectPanelAction {
    #[must_use]
    pub fn new(overlays: Arc<dyn PanelOverlays>) -> Self {
        Self { overlays }
    }
}

#[async_trait::async_trait]
impl Action for InspectPanelAction {
    fn id(&self) -> &str {
        INSPECT_PANEL_ACTION_ID
    }

    fn priority(&self) -> i32 {
        20
    }

    async fn is_compatible(&self, ctx: &ActionContext) -> Result<bool, ActionError> {
        Ok(!ctx.embeddable.inspector_adapters().is_empty())
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<(), ActionError> {
        let adapters = ctx.embeddable.inspector_adapters();
        if adapters.is_empty() {
            return Err(ActionError::Execute {
                action_id: self.id().to_string(),
                message: "embeddable exposes no inspector adapters".into(),
            });
        }
        self.overlays.open_inspector(ctx, &adapters).await
    }

    fn title(&self, _ctx: &ActionContext) -> String {
        "Inspect".into()
    }

    fn icon(&self, _ctx: &ActionContext) -> Option<String> {
        Some("inspect".into())
    }
}

// =============================================================================
// REMOVE
// =============================================================================

#[derive(Default)]
pub struct RemovePanelAction;

impl RemovePanelAction {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Action for RemovePanelAction {
    fn id(&self) -> &str {
        REMOVE_PANEL_ACTION_ID
    }

    fn priority(&self) -> i32 {
        1
    }

    async fn is_compatible(&self, ctx: &ActionContext) -> Result<bool, ActionError> {
        Ok(ctx.is_editing_in_container())
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<(), ActionError> {
        let container = ctx
            .container
            .as_ref()
            .ok_or_else(|| ActionError::MissingContainer { action_id: self.id().to_string() })?;
        let panel_id = ctx.embeddable.id();
        if !container.remove_embeddable(panel_id) {
            return Err(ActionError::PanelNotFound(panel_id.to_string()));
        }
        Ok(())
    }

    fn title(&self, _ctx: &ActionContext) -> String {
        "Delete from dashboard".into()
    }

    fn icon(&self, _ctx: &ActionContext) -> Option<String> {
        Some("trash".into())
    }
}

// =============================================================================
// EDIT (always present)
// =============================================================================

pub struct EditPanelAction {
    overlays: Arc<dyn PanelOverlays>,
}

impl EditPanelAction {
    #[must_use]
    pub fn new(overlays: Arc<dyn PanelOverlays>) -> Self {
        Self { overlays }
    }
}

#[async_trait::async_trait]
impl Action for EditPanelAction {
    fn id(&self) -> &str {
        EDIT_PANEL_ACTION_ID
    }

    async fn is_compatible(&self, _ctx: &ActionContext) -> Result<bool, ActionError> {
        Ok(true)
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<(), ActionError> {
        let Some(url) = ctx.embeddable.edit_url() else {
            return Err(ActionError::Execute {
                action_id: self.id().to_string(),
                message: format!("{} has no edit url", ctx.embeddable.id()),
            });
        };
        self.overlays.open_editor(ctx, &url).await
    }

    fn title(&self, ctx: &ActionContext) -> String {
        format!("Edit {}", ctx.embeddable.type_name())
    }

    fn icon(&self, _ctx: &ActionContext) -> Option<String> {
        Some("pencil".into())
    }
}

// =============================================================================
// CONSTRUCTORS
// =============================================================================

/// Fresh set of panel-local candidates, built per menu open.
#[must_use]
pub fn panel_local_actions(overlays: &Arc<dyn PanelOverlays>) -> Vec<Arc<dyn Action>> {
    vec![
        Arc::new(CustomizePanelTitleAction::new(overlays.clone())),
        Arc::new(AddPanelAction::new(overlays.clone())),
        Arc::new(InspectPanelAction::new(overlays.clone())),
        Arc::new(RemovePanelAction::new()),
    ]
}

#[cfg(test)]
#[path = "panel_actions_test.rs"]
mod tests;
