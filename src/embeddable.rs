//! Embeddables, containers, and the subscription handle that binds them.
//!
//! DESIGN
//! ======
//! An embeddable is the subject a panel renders and that actions act on.
//! A container is the optional parent that owns view mode and title
//! visibility for every panel it holds. Both are collaborators: the panel
//! only talks to them through the traits below.
//!
//! Change notification is explicit observer registration. Subscribing
//! returns a [`Subscription`] whose disposer runs exactly once, either when
//! [`Subscription::unsubscribe`] consumes it or when it is dropped.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

// =============================================================================
// VIEW MODE
// =============================================================================

/// Whether the surrounding dashboard is being edited or only viewed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Edit,
    View,
}

// =============================================================================
// MOUNT POINT
// =============================================================================

/// DOM-like node an embeddable renders itself into.
#[derive(Debug, Default)]
pub struct MountPoint {
    children: Mutex<Vec<String>>,
}

impl MountPoint {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rendered content.
    pub fn append(&self, node: impl Into<String>) {
        self.children
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(node.into());
    }

    /// Snapshot of everything rendered so far.
    #[must_use]
    pub fn children(&self) -> Vec<String> {
        self.children
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Callback invoked by a container whenever its shared settings change.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// Disposer returned by [`Container::subscribe_to_changes`].
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    disposer: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(disposer: impl FnOnce() + Send + 'static) -> Self {
        Self { disposer: Some(Box::new(disposer)) }
    }

    /// Subscription with nothing to release.
    pub fn noop() -> Self {
        Self { disposer: None }
    }

    /// Release the registration. Consumes the handle so it cannot run twice.
    pub fn unsubscribe(mut self) {
        self.dispose();
    }

    fn dispose(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.disposer.is_some())
            .finish()
    }
}

// =============================================================================
// TRAITS
// =============================================================================

/// The subject entity a panel renders.
pub trait Embeddable: Send + Sync {
    fn id(&self) -> &str;

    /// Human-readable type, used in labels such as "Edit visualization".
    fn type_name(&self) -> &str;

    fn title(&self) -> Option<String>;

    fn edit_url(&self) -> Option<String> {
        None
    }

    /// True when this embeddable can itself hold panels.
    fn is_container(&self) -> bool {
        false
    }

    /// Names of inspector adapters (requests, data) this embeddable exposes.
    fn inspector_adapters(&self) -> Vec<String> {
        Vec::new()
    }

    fn render(&self, mount: &MountPoint);
}

/// Parent aggregate that owns settings shared by every panel it holds.
pub trait Container: Send + Sync {
    fn id(&self) -> &str;

    fn view_mode(&self) -> ViewMode;

    fn hide_panel_titles(&self) -> bool;

    fn subscribe_to_changes(&self, callback: ChangeCallback) -> Subscription;

    /// Remove a panel. Returns `false` if no such panel exists.
    fn remove_embeddable(&self, embeddable_id: &str) -> bool;

    /// Override (or with `None`, reset) the title shown for a panel.
    fn set_panel_title(&self, embeddable_id: &str, title: Option<String>);

    fn panel_title(&self, embeddable_id: &str) -> Option<String>;
}

// =============================================================================
// BASIC EMBEDDABLE
// =============================================================================

/// Plain data-backed embeddable. Renders a single node naming itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicEmbeddable {
    id: String,
    type_name: String,
    title: Option<String>,
    edit_url: Option<String>,
    is_container: bool,
    inspector_adapters: Vec<String>,
}

impl BasicEmbeddable {
    #[must_use]
    pub fn new(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
            title: None,
            edit_url: None,
            is_container: false,
            inspector_adapters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_edit_url(mut self, url: impl Into<String>) -> Self {
        self.edit_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_inspector_adapter(mut self, adapter: impl Into<String>) -> Self {
        self.inspector_adapters.push(adapter.into());
        self
    }

    #[must_use]
    pub fn as_container(mut self) -> Self {
        self.is_container = true;
        self
    }
}

impl Embeddable for BasicEmbeddable {
    fn id(&self) -> &str {
        &self.id
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn edit_url(&self) -> Option<String> {
        self.edit_url.clone()
    }

    fn is_container(&self) -> bool {
        self.is_container
    }

    fn inspector_adapters(&self) -> Vec<String> {
        self.inspector_adapters.clone()
    }

    fn render(&self, mount: &MountPoint) {
        mount.append(format!("{}:{}", self.type_name, self.id));
    }
}

#[cfg(test)]
#[path = "embeddable_test.rs"]
mod tests;
