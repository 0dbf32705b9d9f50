//! Shared error plumbing.
//!
//! Each module owns its own `thiserror` enum. This trait gives every one of
//! them a grepable code so log lines and notifications can be filtered
//! without matching on display strings.

/// Grepable error code and retryable flag for structured error reporting.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
