use super::*;
use crate::test_helpers::{Compat, TestAction, as_actions, context_without_container, ids};

#[tokio::test]
async fn keeps_only_compatible_actions_in_candidate_order() {
    let ctx = context_without_container();
    let candidates = as_actions(&[
        TestAction::new("a", 1).shared(),
        TestAction::new("b", 2).with_compat(Compat::No).shared(),
        TestAction::new("c", 3).shared(),
    ]);

    let kept = filter_compatible(candidates, &ctx, FilterOptions::default()).await.unwrap();
    assert_eq!(ids(&kept), vec!["a", "c"]);
}

#[tokio::test]
async fn order_follows_candidates_not_completion() {
    let ctx = context_without_container();
    let candidates = as_actions(&[
        TestAction::new("slow", 1)
            .with_compat(Compat::After(Duration::from_millis(40), true))
            .shared(),
        TestAction::new("fast", 1).shared(),
    ]);

    let kept = filter_compatible(candidates, &ctx, FilterOptions::default()).await.unwrap();
    assert_eq!(ids(&kept), vec!["slow", "fast"]);
}

#[tokio::test]
async fn predicates_run_concurrently() {
    let ctx = context_without_container();
    let candidates = as_actions(&[
        TestAction::new("a", 1)
            .with_compat(Compat::After(Duration::from_millis(100), true))
            .shared(),
        TestAction::new("b", 1)
            .with_compat(Compat::After(Duration::from_millis(100), true))
            .shared(),
        TestAction::new("c", 1)
            .with_compat(Compat::After(Duration::from_millis(100), true))
            .shared(),
    ]);

    let started = tokio::time::Instant::now();
    let kept = filter_compatible(candidates, &ctx, FilterOptions::default()).await.unwrap();
    assert_eq!(kept.len(), 3);
    assert!(started.elapsed() < Duration::from_millis(250), "predicates should overlap");
}

#[tokio::test]
async fn lenient_policy_excludes_failing_predicate() {
    let ctx = context_without_container();
    let candidates = as_actions(&[
        TestAction::new("ok", 1).shared(),
        TestAction::new("broken", 2).with_compat(Compat::Fail).shared(),
    ]);

    let kept = filter_compatible(candidates, &ctx, FilterOptions::default()).await.unwrap();
    assert_eq!(ids(&kept), vec!["ok"]);
}

#[tokio::test]
async fn strict_policy_aborts_on_failing_predicate() {
    let ctx = context_without_container();
    let candidates = as_actions(&[
        TestAction::new("ok", 1).shared(),
        TestAction::new("broken", 2).with_compat(Compat::Fail).shared(),
    ]);
    let options = FilterOptions { policy: CompatibilityPolicy::Strict, timeout: None };

    let Err(err) = filter_compatible(candidates, &ctx, options).await else {
        panic!("strict filter should fail on a broken predicate");
    };
    assert!(matches!(err, ActionError::Compatibility { ref action_id, .. } if action_id == "broken"));
    assert_eq!(err.error_code(), "E_ACTION_COMPATIBILITY");
}

#[tokio::test]
async fn timeout_excludes_hanging_predicate_when_lenient() {
    let ctx = context_without_container();
    let candidates = as_actions(&[
        TestAction::new("hang", 1)
            .with_compat(Compat::After(Duration::from_secs(5), true))
            .shared(),
        TestAction::new("ok", 1).shared(),
    ]);
    let options = FilterOptions { policy: CompatibilityPolicy::Lenient, timeout: Some(Duration::from_millis(20)) };

    let kept = filter_compatible(candidates, &ctx, options).await.unwrap();
    assert_eq!(ids(&kept), vec!["ok"]);
}

#[tokio::test]
async fn timeout_is_reported_when_strict() {
    let ctx = context_without_container();
    let candidates = as_actions(&[TestAction::new("hang", 1)
        .with_compat(Compat::After(Duration::from_secs(5), true))
        .shared()]);
    let options = FilterOptions { policy: CompatibilityPolicy::Strict, timeout: Some(Duration::from_millis(20)) };

    let Err(err) = filter_compatible(candidates, &ctx, options).await else {
        panic!("strict filter should fail on a broken predicate");
    };
    assert!(matches!(err, ActionError::CompatibilityTimeout { timeout_ms: 20, .. }));
    assert!(err.retryable());
}

#[tokio::test]
async fn empty_candidates_yield_empty_result() {
    let ctx = context_without_container();
    let kept = filter_compatible(Vec::new(), &ctx, FilterOptions::default()).await.unwrap();
    assert!(kept.is_empty());
}
