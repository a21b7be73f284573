//! Page Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A page generation error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for page operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Template resource missing, unreadable, or failed to compile/render.
    #[display("page template unusable: {_0}")]
    Template(#[error(not(source))] String),
    /// Asset was not loadable from the builtins.
    #[display("asset not found: {_0}")]
    AssetNotFound(#[error(not(source))] String),
    /// A generated file could not be written.
    #[display("failed to write: {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Write(_))
    }
}
