//! Repository error types.
//!
//! This module provides a [`RepositoryError`] enum that wraps store-level
//! errors and adds the decode failure variant for repository operations.
//! Absence of a record is not an error; lookups return `Option` instead.

use userdir_types::StoreError;

use crate::codec::DecodeError;

/// Result type alias for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Stored bytes under a key did not parse as a user record.
    ///
    /// Always fatal to the enclosing operation; malformed data indicates
    /// corruption worth surfacing, never silently skipped.
    #[error("malformed record at {key}: {source}")]
    Decode {
        key: String,
        source: DecodeError,
    },

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
