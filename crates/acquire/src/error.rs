//! Acquisition Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Errors here are either fatal to the
//! run (the downloader is missing, the output directory is unusable) or are
//! caught per link and recorded as a [`LinkStatus`](crate::LinkStatus).

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An acquisition error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for acquisition operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The external download program is not installed or not on `PATH`.
    #[display("download tool `{_0}` not found on this system")]
    ToolNotFound(#[error(not(source))] String),
    /// The download program could not be started at all.
    #[display("failed to launch download tool `{_0}`")]
    ToolLaunch(#[error(not(source))] String),
    /// The download program exited unsuccessfully. `None` when killed by a signal.
    #[display("download tool exited with code: {}", _0.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    ToolFailed(#[error(not(source))] Option<i32>),
    /// The output directory could not be created or listed.
    #[display("output directory unusable: {}", _0.display())]
    OutputDirectory(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ToolFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::ToolFailed(Some(2)).to_string(), "download tool exited with code: 2");
        assert_eq!(ErrorKind::ToolFailed(None).to_string(), "download tool exited with code: signal");
        assert_eq!(ErrorKind::ToolNotFound("scdl".into()).to_string(), "download tool `scdl` not found on this system");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::ToolFailed(Some(1)).is_retryable());
        assert!(!ErrorKind::ToolNotFound("scdl".into()).is_retryable());
    }
}
