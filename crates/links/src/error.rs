//! Link Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Per-link resolution failures are not
//! errors; they are reported through [`Resolution`](crate::Resolution).

use derive_more::{Display, Error};

/// A link error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for link operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The HTTP client could not be constructed (TLS backend, bad options).
    #[display("failed to build HTTP client")]
    Client,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
