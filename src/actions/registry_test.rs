use super::*;
use crate::actions::filter::CompatibilityPolicy;
use crate::test_helpers::{Compat, TestAction, context_without_container, ids};

#[tokio::test]
async fn unknown_trigger_returns_empty() {
    let registry = InMemoryActionRegistry::new();
    let ctx = context_without_container();
    let actions = registry.actions_for_trigger("NOPE", &ctx, FilterOptions::default()).await.unwrap();
    assert!(actions.is_empty());
}

#[tokio::test]
async fn returns_attached_compatible_actions_in_attach_order() {
    let registry = InMemoryActionRegistry::new();
    registry.register_action(TestAction::new("share", 5).shared()).await.unwrap();
    registry
        .register_action(TestAction::new("hidden", 7).with_compat(Compat::No).shared())
        .await
        .unwrap();
    registry.register_action(TestAction::new("drilldown", 9).shared()).await.unwrap();

    registry.attach_action(CONTEXT_MENU_TRIGGER, "drilldown").await.unwrap();
    registry.attach_action(CONTEXT_MENU_TRIGGER, "hidden").await.unwrap();
    registry.attach_action(CONTEXT_MENU_TRIGGER, "share").await.unwrap();

    let ctx = context_without_container();
    let actions = registry.actions_for_trigger(CONTEXT_MENU_TRIGGER, &ctx, FilterOptions::default()).await.unwrap();
    assert_eq!(ids(&actions), vec!["drilldown", "share"]);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let registry = InMemoryActionRegistry::new();
    registry.register_action(TestAction::new("share", 5).shared()).await.unwrap();
    let err = registry
        .register_action(TestAction::new("share", 1).shared())
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateAction(ref id) if id == "share"));
    assert_eq!(err.error_code(), "E_ACTION_DUPLICATE");
}

#[tokio::test]
async fn attaching_unknown_action_fails() {
    let registry = InMemoryActionRegistry::new();
    let err = registry.attach_action(CONTEXT_MENU_TRIGGER, "ghost").await.unwrap_err();
    assert!(matches!(err, RegistryError::ActionNotFound(_)));
}

#[tokio::test]
async fn attaching_twice_keeps_one_entry() {
    let registry = InMemoryActionRegistry::new();
    registry.register_action(TestAction::new("share", 5).shared()).await.unwrap();
    registry.attach_action(CONTEXT_MENU_TRIGGER, "share").await.unwrap();
    registry.attach_action(CONTEXT_MENU_TRIGGER, "share").await.unwrap();

    let ctx = context_without_container();
    let actions = registry.actions_for_trigger(CONTEXT_MENU_TRIGGER, &ctx, FilterOptions::default()).await.unwrap();
    assert_eq!(actions.len(), 1);
}

#[tokio::test]
async fn detach_and_unregister_remove_actions() {
    let registry = InMemoryActionRegistry::new();
    registry.register_action(TestAction::new("a", 1).shared()).await.unwrap();
    registry.register_action(TestAction::new("b", 1).shared()).await.unwrap();
    registry.attach_action(CONTEXT_MENU_TRIGGER, "a").await.unwrap();
    registry.attach_action(CONTEXT_MENU_TRIGGER, "b").await.unwrap();

    assert!(registry.detach_action(CONTEXT_MENU_TRIGGER, "a").await);
    assert!(!registry.detach_action(CONTEXT_MENU_TRIGGER, "a").await);
    registry.unregister_action("b").await.unwrap();

    let ctx = context_without_container();
    let actions = registry.actions_for_trigger(CONTEXT_MENU_TRIGGER, &ctx, FilterOptions::default()).await.unwrap();
    assert!(actions.is_empty());
    assert!(matches!(
        registry.unregister_action("b").await,
        Err(RegistryError::ActionNotFound(_))
    ));
}

#[tokio::test]
async fn strict_registry_surfaces_predicate_failure() {
    let registry = InMemoryActionRegistry::new();
    registry
        .register_action(TestAction::new("broken", 1).with_compat(Compat::Fail).shared())
        .await
        .unwrap();
    registry.attach_action(CONTEXT_MENU_TRIGGER, "broken").await.unwrap();

    let ctx = context_without_container();
    let strict = FilterOptions { policy: CompatibilityPolicy::Strict, timeout: None };
    let Err(err) = registry.actions_for_trigger(CONTEXT_MENU_TRIGGER, &ctx, strict).await else {
        panic!("strict registry lookup should fail");
    };
    assert!(matches!(err, RegistryError::Action(ActionError::Compatibility { .. })));
    assert_eq!(err.error_code(), "E_ACTION_COMPATIBILITY");
}

#[tokio::test]
async fn same_registry_honours_per_lookup_policy() {
    let registry = InMemoryActionRegistry::new();
    registry
        .register_action(TestAction::new("broken", 1).with_compat(Compat::Fail).shared())
        .await
        .unwrap();
    registry.register_action(TestAction::new("share", 2).shared()).await.unwrap();
    registry.attach_action(CONTEXT_MENU_TRIGGER, "broken").await.unwrap();
    registry.attach_action(CONTEXT_MENU_TRIGGER, "share").await.unwrap();

    let ctx = context_without_container();
    let lenient = registry
        .actions_for_trigger(CONTEXT_MENU_TRIGGER, &ctx, FilterOptions::default())
        .await
        .unwrap();
    assert_eq!(ids(&lenient), vec!["share"]);

    let strict = FilterOptions { policy: CompatibilityPolicy::Strict, timeout: None };
    assert!(registry.actions_for_trigger(CONTEXT_MENU_TRIGGER, &ctx, strict).await.is_err());
}
