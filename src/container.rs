//! In-memory dashboard container.
//!
//! DESIGN
//! ======
//! Holds the panels of one dashboard together with the settings they share
//! (view mode, title visibility). Observers are notified after every actual
//! change. Callbacks run outside the lock so they may read the container
//! back without deadlocking.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::{debug, info};

use crate::embeddable::{ChangeCallback, Container, Embeddable, Subscription, ViewMode};

struct PanelEntry {
    embeddable: Arc<dyn Embeddable>,
    custom_title: Option<String>,
}

#[derive(Default)]
struct ContainerInner {
    view_mode: ViewMode,
    hide_panel_titles: bool,
    /// Panels in insertion order.
    panels: Vec<PanelEntry>,
    observers: BTreeMap<u64, ChangeCallback>,
    next_observer_id: u64,
}

/// Dashboard that owns panels and their shared display settings.
#[derive(Clone)]
pub struct DashboardContainer {
    id: String,
    inner: Arc<Mutex<ContainerInner>>,
}

impl DashboardContainer {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), inner: Arc::new(Mutex::new(ContainerInner::default())) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ContainerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a panel. Replaces any existing panel with the same id.
    pub fn add_panel(&self, embeddable: Arc<dyn Embeddable>) {
        {
            let mut inner = self.lock();
            let id = embeddable.id().to_string();
            inner.panels.retain(|p| p.embeddable.id() != id);
            inner.panels.push(PanelEntry { embeddable, custom_title: None });
            info!(container_id = %self.id, panel_id = %id, count = inner.panels.len(), "panel added");
        }
        self.notify();
    }

    #[must_use]
    pub fn panels(&self) -> Vec<Arc<dyn Embeddable>> {
        self.lock().panels.iter().map(|p| p.embeddable.clone()).collect()
    }

    pub fn set_view_mode(&self, view_mode: ViewMode) {
        let changed = {
            let mut inner = self.lock();
            let changed = inner.view_mode != view_mode;
            inner.view_mode = view_mode;
            changed
        };
        if changed {
            self.notify();
        }
    }

    pub fn set_hide_panel_titles(&self, hide: bool) {
        let changed = {
            let mut inner = self.lock();
            let changed = inner.hide_panel_titles != hide;
            inner.hide_panel_titles = hide;
            changed
        };
        if changed {
            self.notify();
        }
    }

    /// Number of live change observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }

    fn notify(&self) {
        let callbacks: Vec<ChangeCallback> = self.lock().observers.values().cloned().collect();
        debug!(container_id = %self.id, observers = callbacks.len(), "notifying container observers");
        for callback in callbacks {
            callback();
        }
    }
}

impl Container for DashboardContainer {
    fn id(&self) -> &str {
        &self.id
    }

    fn view_mode(&self) -> ViewMode {
        self.lock().view_mode
    }

    fn hide_panel_titles(&self) -> bool {
        self.lock().hide_panel_titles
    }

    fn subscribe_to_changes(&self, callback: ChangeCallback) -> Subscription {
        let key = {
            let mut inner = self.lock();
            let key = inner.next_observer_id;
            inner.next_observer_id += 1;
            inner.observers.insert(key, callback);
            key
        };

        let weak: Weak<Mutex<ContainerInner>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .observers
                    .remove(&key);
            }
        })
    }

    fn remove_embeddable(&self, embeddable_id: &str) -> bool {
        let removed = {
            let mut inner = self.lock();
            let before = inner.panels.len();
            inner.panels.retain(|p| p.embeddable.id() != embeddable_id);
            before != inner.panels.len()
        };
        if removed {
            info!(container_id = %self.id, panel_id = %embeddable_id, "panel removed");
            self.notify();
        }
        removed
    }

    fn set_panel_title(&self, embeddable_id: &str, title: Option<String>) {
        let changed = {
            let mut inner = self.lock();
            match inner.panels.iter_mut().find(|p| p.embeddable.id() == embeddable_id) {
                Some(entry) if entry.custom_title != title => {
                    entry.custom_title = title;
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.notify();
        }
    }

    fn panel_title(&self, embeddable_id: &str) -> Option<String> {
        self.lock()
            .panels
            .iter()
            .find(|p| p.embeddable.id() == embeddable_id)
            .and_then(|p| p.custom_title.clone())
    }
}

#[cfg(test)]
#[path = "container_test.rs"]
mod tests;
