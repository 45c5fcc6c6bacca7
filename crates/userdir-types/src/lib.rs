//! # Userdir Types
//!
//! Shared type definitions for the userdir service.
//!
//! This crate provides the core types used across the userdir crates,
//! ensuring a single source of truth and preventing circular dependencies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Core Domain Types
// ============================================================================

/// A user record as stored in the key-value store.
///
/// The `id` is stable and is used verbatim to derive the storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

impl User {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors reported by a store backend.
///
/// Key absence is not an error; point reads return `Option` instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store is unreachable or the connection was lost.
    #[error("store connection error: {0}")]
    Connection(String),

    /// The store returned a protocol-level failure.
    #[error("store protocol error: {0}")]
    Protocol(String),

    /// Internal error in the store layer.
    #[error("internal store error: {0}")]
    Internal(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

// ============================================================================
// Response Types
// ============================================================================

/// A user as rendered by the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: u64,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self { id: user.id, name: user.name }
    }
}

/// Response from the list-users operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
}
