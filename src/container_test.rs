use super::*;
use crate::embeddable::BasicEmbeddable;
use std::sync::atomic::{AtomicUsize, Ordering};

fn counting_callback() -> (ChangeCallback, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let callback: ChangeCallback = Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (callback, calls)
}

#[test]
fn new_container_defaults_to_edit_with_titles() {
    let container = DashboardContainer::new("dash");
    assert_eq!(container.id(), "dash");
    assert_eq!(container.view_mode(), ViewMode::Edit);
    assert!(!container.hide_panel_titles());
    assert!(container.panels().is_empty());
}

#[test]
fn view_mode_change_notifies_observers() {
    let container = DashboardContainer::new("dash");
    let (callback, calls) = counting_callback();
    let _sub = container.subscribe_to_changes(callback);

    container.set_view_mode(ViewMode::View);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(container.view_mode(), ViewMode::View);
}

#[test]
fn unchanged_setting_does_not_notify() {
    let container = DashboardContainer::new("dash");
    let (callback, calls) = counting_callback();
    let _sub = container.subscribe_to_changes(callback);

    container.set_view_mode(ViewMode::Edit);
    container.set_hide_panel_titles(false);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn unsubscribe_stops_notifications() {
    let container = DashboardContainer::new("dash");
    let (callback, calls) = counting_callback();
    let sub = container.subscribe_to_changes(callback);
    assert_eq!(container.observer_count(), 1);

    sub.unsubscribe();
    assert_eq!(container.observer_count(), 0);

    container.set_hide_panel_titles(true);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn observer_may_read_container_during_notification() {
    let container = DashboardContainer::new("dash");
    let seen = Arc::new(Mutex::new(None));
    let reader = container.clone();
    let sink = seen.clone();
    let _sub = container.subscribe_to_changes(Arc::new(move || {
        *sink.lock().unwrap() = Some(reader.view_mode());
    }));

    container.set_view_mode(ViewMode::View);
    assert_eq!(*seen.lock().unwrap(), Some(ViewMode::View));
}

// =============================================================
// Panels
// =============================================================

#[test]
fn remove_embeddable_reports_presence() {
    let container = DashboardContainer::new("dash");
    container.add_panel(Arc::new(BasicEmbeddable::new("a", "visualization")));
    container.add_panel(Arc::new(BasicEmbeddable::new("b", "search")));

    assert!(container.remove_embeddable("a"));
    assert!(!container.remove_embeddable("a"));
    let ids: Vec<String> = container.panels().iter().map(|p| p.id().to_string()).collect();
    assert_eq!(ids, vec!["b".to_string()]);
}

#[test]
fn add_panel_replaces_same_id() {
    let container = DashboardContainer::new("dash");
    container.add_panel(Arc::new(BasicEmbeddable::new("a", "visualization")));
    container.add_panel(Arc::new(BasicEmbeddable::new("a", "map")));

    let panels = container.panels();
    assert_eq!(panels.len(), 1);
    assert_eq!(panels[0].type_name(), "map");
}

#[test]
fn panel_title_override_and_reset() {
    let container = DashboardContainer::new("dash");
    container.add_panel(Arc::new(BasicEmbeddable::new("a", "visualization")));

    container.set_panel_title("a", Some("Revenue".into()));
    assert_eq!(container.panel_title("a").as_deref(), Some("Revenue"));

    container.set_panel_title("a", None);
    assert_eq!(container.panel_title("a"), None);
}

#[test]
fn panel_title_for_unknown_panel_is_ignored() {
    let container = DashboardContainer::new("dash");
    let (callback, calls) = counting_callback();
    let _sub = container.subscribe_to_changes(callback);

    container.set_panel_title("missing", Some("x".into()));
    assert_eq!(container.panel_title("missing"), None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
