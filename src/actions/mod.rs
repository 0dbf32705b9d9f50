//! Actions — capability trait, applicability filter, registry, and the
//! actions every panel carries.
//!
//! DESIGN
//! ======
//! An action is anything that can say whether it applies to a context and
//! then run against it. Menus are built from two sources: trigger-bound
//! actions from an injected [`ActionRegistry`], and panel-local actions
//! constructed fresh for every menu open.

pub mod filter;
pub mod panel_actions;
pub mod registry;
pub mod types;

pub use filter::{CompatibilityPolicy, FilterOptions, filter_compatible};
pub use registry::{ActionRegistry, CONTEXT_MENU_TRIGGER, InMemoryActionRegistry, RegistryError};
pub use types::{Action, ActionContext, ActionError};
