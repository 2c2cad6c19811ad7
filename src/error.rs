//! Error types for the Actionguard library.

use thiserror::Error;

/// Main error type for Actionguard operations.
///
/// Throttling outcomes are not errors: [`crate::guard::RateLimitGuard::evaluate`]
/// reports them as ordinary [`crate::guard::Decision`] values, and degrades to
/// a fail-closed decision on internal malfunctions. The only condition that
/// escalates past the guard is an append failure, since a lost record would
/// let later evaluations undercount usage.
#[derive(Error, Debug)]
pub enum GuardError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The action log could not accept a new record; fatal to the guard
    #[error("Failed to append action record: {0}")]
    AppendFailure(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Actionguard operations.
pub type Result<T> = std::result::Result<T, GuardError>;
