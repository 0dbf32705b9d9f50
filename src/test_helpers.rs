//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::actions::panel_actions::{PanelOverlays, TitleChoice};
use crate::actions::{Action, ActionContext, ActionError};
use crate::container::DashboardContainer;
use crate::embeddable::{BasicEmbeddable, Container, Embeddable};

// =============================================================================
// TEST ACTION
// =============================================================================

/// How a [`TestAction`] answers its compatibility check.
#[derive(Clone, Copy, Debug)]
pub enum Compat {
    Yes,
    No,
    Fail,
    /// Resolve to the given answer after sleeping.
    After(Duration, bool),
}

pub struct TestAction {
    id: String,
    priority: i32,
    compat: Compat,
    fail_execute: bool,
    pub executed: AtomicUsize,
}

impl TestAction {
    pub fn new(id: &str, priority: i32) -> Self {
        Self { id: id.into(), priority, compat: Compat::Yes, fail_execute: false, executed: AtomicUsize::new(0) }
    }

    pub fn with_compat(mut self, compat: Compat) -> Self {
        self.compat = compat;
        self
    }

    pub fn failing_execute(mut self) -> Self {
        self.fail_execute = true;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn executions(&self) -> usize {
        self.executed.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Action for TestAction {
    fn id(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    async fn is_compatible(&self, _ctx: &ActionContext) -> Result<bool, ActionError> {
        match self.compat {
            Compat::Yes => Ok(true),
            Compat::No => Ok(false),
            Compat::Fail => Err(ActionError::Compatibility { action_id: self.id.clone(), message: "boom".into() }),
            Compat::After(delay, answer) => {
                tokio::time::sleep(delay).await;
                Ok(answer)
            }
        }
    }

    async fn execute(&self, _ctx: &ActionContext) -> Result<(), ActionError> {
        self.executed.fetch_add(1, Ordering::SeqCst);
        if self.fail_execute {
            return Err(ActionError::Execute { action_id: self.id.clone(), message: "execute failed".into() });
        }
        Ok(())
    }

    fn title(&self, ctx: &ActionContext) -> String {
        format!("{} on {}", self.id, ctx.embeddable.id())
    }

    fn icon(&self, _ctx: &ActionContext) -> Option<String> {
        Some("dot".into())
    }
}

pub fn as_actions(actions: &[Arc<TestAction>]) -> Vec<Arc<dyn Action>> {
    actions.iter().map(|a| a.clone() as Arc<dyn Action>).collect()
}

pub fn ids(actions: &[Arc<dyn Action>]) -> Vec<String> {
    actions.iter().map(|a| a.id().to_string()).collect()
}

// =============================================================================
// CONTEXT
// =============================================================================

pub fn embeddable(id: &str) -> Arc<dyn Embeddable> {
    Arc::new(
        BasicEmbeddable::new(id, "visualization")
            .with_title("Revenue")
            .with_edit_url(format!("#/visualize/edit/{id}")),
    )
}

pub fn context_without_container() -> ActionContext {
    ActionContext::new(embeddable("panel-1"))
}

/// Context whose embeddable is already a panel of a fresh dashboard.
pub fn context_with_dashboard() -> (ActionContext, DashboardContainer) {
    let dashboard = DashboardContainer::new("dash-1");
    let panel = embeddable("panel-1");
    dashboard.add_panel(panel.clone());
    let container: Arc<dyn Container> = Arc::new(dashboard.clone());
    (ActionContext::new(panel).with_container(container), dashboard)
}

// =============================================================================
// OVERLAYS
// =============================================================================

/// Records every overlay request.
#[derive(Default)]
pub struct RecordingOverlays {
    pub calls: Mutex<Vec<String>>,
    pub title_choice: Mutex<Option<TitleChoice>>,
}

impl RecordingOverlays {
    pub fn answering_title(choice: TitleChoice) -> Self {
        Self { calls: Mutex::new(Vec::new()), title_choice: Mutex::new(Some(choice)) }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PanelOverlays for RecordingOverlays {
    async fn prompt_panel_title(&self, ctx: &ActionContext, current: Option<String>) -> Result<TitleChoice, ActionError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("title:{}:{}", ctx.embeddable.id(), current.unwrap_or_default()));
        Ok(self.title_choice.lock().unwrap().clone().unwrap_or(TitleChoice::Keep))
    }

    async fn open_add_panel_flyout(&self, ctx: &ActionContext) -> Result<(), ActionError> {
        self.calls.lock().unwrap().push(format!("add:{}", ctx.embeddable.id()));
        Ok(())
    }

    async fn open_inspector(&self, ctx: &ActionContext, adapters: &[String]) -> Result<(), ActionError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("inspect:{}:{}", ctx.embeddable.id(), adapters.join(",")));
        Ok(())
    }

    async fn open_editor(&self, _ctx: &ActionContext, edit_url: &str) -> Result<(), ActionError> {
        self.calls.lock().unwrap().push(format!("edit:{edit_url}"));
        Ok(())
    }
}
