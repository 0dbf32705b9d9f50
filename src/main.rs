use std::sync::Arc;

use dashpanel::actions::panel_actions::{PanelOverlays, REMOVE_PANEL_ACTION_ID, TitleChoice};
use dashpanel::actions::{Action, ActionContext, ActionError, CONTEXT_MENU_TRIGGER, InMemoryActionRegistry};
use dashpanel::config::PanelConfig;
use dashpanel::container::DashboardContainer;
use dashpanel::embeddable::{BasicEmbeddable, Container, Embeddable, MountPoint};
use dashpanel::panel::{EmbeddablePanel, PanelServices};
use tracing::info;

/// Overlays that only log what would have been opened.
struct LoggingOverlays;

#[async_trait::async_trait]
impl PanelOverlays for LoggingOverlays {
    async fn prompt_panel_title(&self, ctx: &ActionContext, current: Option<String>) -> Result<TitleChoice, ActionError> {
        info!(panel_id = ctx.embeddable.id(), ?current, "title editor requested");
        Ok(TitleChoice::Keep)
    }

    async fn open_add_panel_flyout(&self, ctx: &ActionContext) -> Result<(), ActionError> {
        info!(panel_id = ctx.embeddable.id(), "add panel flyout requested");
        Ok(())
    }

    async fn open_inspector(&self, ctx: &ActionContext, adapters: &[String]) -> Result<(), ActionError> {
        info!(panel_id = ctx.embeddable.id(), ?adapters, "inspector requested");
        Ok(())
    }

    async fn open_editor(&self, ctx: &ActionContext, edit_url: &str) -> Result<(), ActionError> {
        info!(panel_id = ctx.embeddable.id(), %edit_url, "editor requested");
        Ok(())
    }
}

/// Registry-supplied action: copy a share link for the panel.
struct SharePanelAction;

#[async_trait::async_trait]
impl Action for SharePanelAction {
    fn id(&self) -> &str {
        "sharePanel"
    }

    fn priority(&self) -> i32 {
        5
    }

    async fn is_compatible(&self, ctx: &ActionContext) -> Result<bool, ActionError> {
        Ok(ctx.embeddable.edit_url().is_some())
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<(), ActionError> {
        info!(panel_id = ctx.embeddable.id(), "share link copied");
        Ok(())
    }

    fn title(&self, ctx: &ActionContext) -> String {
        format!("Share {}", ctx.embeddable.type_name())
    }

    fn icon(&self, _ctx: &ActionContext) -> Option<String> {
        Some("share".into())
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = PanelConfig::from_env().expect("invalid panel config");
    info!(policy = ?config.compat_policy, timeout = ?config.compat_timeout, "panel config loaded");

    let registry = InMemoryActionRegistry::new();
    registry
        .register_action(Arc::new(SharePanelAction))
        .await
        .expect("share action registration failed");
    registry
        .attach_action(CONTEXT_MENU_TRIGGER, "sharePanel")
        .await
        .expect("share action attach failed");

    let dashboard = DashboardContainer::new("sales-overview");
    let subject: Arc<dyn Embeddable> = Arc::new(
        BasicEmbeddable::new("revenue-by-region", "visualization")
            .with_title("Revenue by region")
            .with_edit_url("#/visualize/edit/revenue-by-region")
            .with_inspector_adapter("requests"),
    );
    dashboard.add_panel(subject.clone());
    let container: Arc<dyn Container> = Arc::new(dashboard.clone());

    let services = PanelServices { registry: Arc::new(registry), overlays: Arc::new(LoggingOverlays), config };
    let panel = EmbeddablePanel::new(subject, Some(container), services);

    let root = MountPoint::new();
    panel.mount(&root).expect("panel mount failed");

    let menu = panel.open_context_menu().await.expect("context menu build failed");
    let json = serde_json::to_string_pretty(&menu.descriptors()).expect("menu descriptor serialization failed");
    println!("{json}");

    if let Some(remove) = menu.main_panel().and_then(|p| p.item(REMOVE_PANEL_ACTION_ID)) {
        remove.click().await.expect("remove panel failed");
    }
    info!(remaining = dashboard.panels().len(), "dashboard panels after removal");

    panel.unmount().expect("panel unmount failed");
}
