//! Pipeline Error Types
//!
//! Only conditions that stop a run before it can produce anything end up
//! here. Everything that goes wrong for a single link or file is recorded in
//! the [`Report`](crate::Report) instead.

use derive_more::{Display, Error};

/// A fatal pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("configuration could not be loaded")]
    Config,
    #[display("download tool unavailable")]
    Downloader,
    #[display("link resolver could not be initialized")]
    Resolver,
    #[display("output directory could not be prepared")]
    OutputDirectory,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::OutputDirectory)
    }
}
