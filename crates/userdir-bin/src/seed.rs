//! Default data seeding
//!
//! Ensures the default user records exist in the store on startup.
//!
//! # Seeding Flow
//!
//! 1. For each default record, check whether its key already holds a value
//! 2. Write only the missing records
//! 3. Return the number of records written
//!
//! Idempotent and safe to call on every startup; existing records are never
//! overwritten.

use std::sync::Arc;

use anyhow::{Context, Result};
use userdir_repository::{codec, keys};
use userdir_store::KvClient;
use userdir_types::User;

/// The records every fresh deployment starts with.
pub fn default_users() -> Vec<User> {
    vec![
        User::new(1, "alpha"),
        User::new(2, "bravo"),
        User::new(3, "charlie"),
        User::new(4, "delta"),
    ]
}

/// Ensure the default user records exist, writing only the missing ones.
///
/// Returns the number of records written.
pub async fn seed_default_users(client: &Arc<dyn KvClient>) -> Result<usize> {
    let mut written = 0;

    for user in default_users() {
        let key = keys::user::by_id(&user.id.to_string());

        let existing = client
            .get(&key)
            .await
            .with_context(|| format!("failed to check for existing record {}", key))?;
        if existing.is_some() {
            continue;
        }

        let bytes = codec::encode(&user)
            .with_context(|| format!("failed to encode default record {}", key))?;
        client
            .set(&key, bytes)
            .await
            .with_context(|| format!("failed to write default record {}", key))?;

        written += 1;
    }

    if written > 0 {
        tracing::info!(written, "Seeded default user records");
    } else {
        tracing::info!("Default user records already present");
    }

    Ok(written)
}
