//! Artwork Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An artwork error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for artwork operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The audio file to read from does not exist.
    #[display("audio file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The audio file's tag container could not be parsed.
    #[display("unreadable metadata container")]
    Metadata,
    /// The image could not be written next to the audio file.
    #[display("failed to write image: {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Write(_))
    }
}
