//! Catalog Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.
//!
//! None of these ever reach a query caller: record-level failures are logged
//! and the record skipped, and queries answer with `Option`/[`RouterOutcome`].
//! They surface only from constructors and from [`Record::parse`] itself.
//!
//! [`RouterOutcome`]: crate::RouterOutcome
//! [`Record::parse`]: crate::Record::parse

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Record bytes are not a valid course record.
    #[display("malformed course record: {}", _0.display())]
    RecordParse(#[error(not(source))] PathBuf),
    /// Record file claims to be compressed but can't be decompressed.
    #[display("corrupt compressed record: {}", _0.display())]
    Decompress(#[error(not(source))] PathBuf),
    /// Record is larger than the configured maximum, before or after
    /// decompression.
    #[display("course record too large: {}", _0.display())]
    TooLarge(#[error(not(source))] PathBuf),
    /// The backing record source failed.
    #[display("storage error")]
    Storage,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage)
    }
}
