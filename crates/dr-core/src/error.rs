//! Error types for the relay core.

use thiserror::Error;

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

/// Errors that can occur while interpreting a chat line.
///
/// Every variant is turned into outbound text before it leaves the core.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The evaluator was unreachable or answered with something unreadable.
    #[error("{0}")]
    Transport(String),

    /// A secret index, table name or server URL does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A bracketed target list named more targets than allowed.
    #[error("you can roll at most {limit} times at once (tried to roll {attempted} times)")]
    TooManyTargets {
        /// Number of targets in the request.
        attempted: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// The admin password did not match.
    ///
    /// Same text for every subcommand.
    #[error("Incorrect password.")]
    PasswordMismatch,

    /// An uploaded table file could not be parsed.
    #[error("invalid dice table: {0}")]
    InvalidTable(String),

    /// A subcommand was missing a required argument.
    #[error("{0}")]
    Usage(String),
}
