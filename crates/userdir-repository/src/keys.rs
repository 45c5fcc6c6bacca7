//! Key encoding utilities for userdir storage.
//!
//! This module provides functions for building storage keys following a
//! consistent key schema:
//!
//! - `users:{id}` - User by external identifier
//! - `users:*` - Scan pattern covering every user key

/// Namespace prefix for all user keys.
pub const USERS_PREFIX: &str = "users";

/// Key builders for User records.
pub mod user {
    use super::USERS_PREFIX;

    /// Build key for a user by external identifier.
    ///
    /// Schema: `users:{id}`
    #[inline]
    pub fn by_id(id: &str) -> String {
        format!("{}:{}", USERS_PREFIX, id)
    }

    /// Build the scan pattern matching every user key.
    ///
    /// Schema: `users:*`
    #[inline]
    pub fn all_pattern() -> String {
        format!("{}:*", USERS_PREFIX)
    }
}
