//! Concurrent applicability filtering.
//!
//! DESIGN
//! ======
//! Every candidate's `is_compatible` runs concurrently and the results are
//! joined before anything is returned, so callers only ever see a complete
//! answer. Output preserves candidate order regardless of completion order.
//!
//! ERROR HANDLING
//! ==============
//! A failing or timed-out predicate is handled per [`CompatibilityPolicy`]:
//! lenient excludes the action and logs, strict aborts with the first
//! failure in candidate order.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::warn;

use super::types::{Action, ActionContext, ActionError};
use crate::error::ErrorCode;

/// What to do when a compatibility predicate fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompatibilityPolicy {
    /// Exclude the failing action and keep going.
    #[default]
    Lenient,
    /// Abort the whole batch.
    Strict,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub policy: CompatibilityPolicy,
    /// Per-predicate limit. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Return the candidates whose predicate resolves `true`, in candidate order.
///
/// # Errors
///
/// Under [`CompatibilityPolicy::Strict`], returns the first predicate failure.
/// Never fails under [`CompatibilityPolicy::Lenient`].
pub async fn filter_compatible(
    candidates: Vec<Arc<dyn Action>>,
    ctx: &ActionContext,
    options: FilterOptions,
) -> Result<Vec<Arc<dyn Action>>, ActionError> {
    let outcomes = join_all(
        candidates
            .iter()
            .map(|action| check_compatible(action.as_ref(), ctx, options.timeout)),
    )
    .await;

    let mut compatible = Vec::with_capacity(candidates.len());
    for (action, outcome) in candidates.into_iter().zip(outcomes) {
        match outcome {
            Ok(true) => compatible.push(action),
            Ok(false) => {}
            Err(e) => match options.policy {
                CompatibilityPolicy::Lenient => {
                    warn!(
                        action_id = action.id(),
                        code = e.error_code(),
                        error = %e,
                        "excluding action after failed compatibility check"
                    );
                }
                CompatibilityPolicy::Strict => return Err(e),
            },
        }
    }
    Ok(compatible)
}

async fn check_compatible(
    action: &dyn Action,
    ctx: &ActionContext,
    timeout: Option<Duration>,
) -> Result<bool, ActionError> {
    let Some(limit) = timeout else {
        return action.is_compatible(ctx).await;
    };

    match tokio::time::timeout(limit, action.is_compatible(ctx)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(ActionError::CompatibilityTimeout {
            action_id: action.id().to_string(),
            timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
