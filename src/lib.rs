//! Headless dashboard panel logic.
//!
//! ARCHITECTURE
//! ============
//! - `actions`: action trait, concurrent applicability filter, trigger
//!   registry, and the actions every panel carries.
//! - `panel`: embeddable panel lifecycle and context-menu assembly.
//! - `embeddable` / `container`: the subject and parent collaborators.
//! - `spaces`, `side_tabs`: view models for the spaces management grid and
//!   the code browser sidebar.
//!
//! Rendering, routing and i18n are the caller's business; everything here
//! produces plain data for a UI layer to draw.

pub mod actions;
pub mod config;
pub mod container;
pub mod embeddable;
pub mod error;
pub mod panel;
pub mod side_tabs;
pub mod spaces;

#[cfg(test)]
pub(crate) mod test_helpers;
