//! Redis storage backend
//!
//! Connects to the external Redis store through a multiplexed connection
//! manager. The manager owns reconnection; this backend only maps driver
//! errors into [`StoreError`].

use async_stream::try_stream;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;
use userdir_types::StoreError;

use crate::{KeyBatchStream, KvClient, Result};

/// Redis-backed [`KvClient`].
///
/// Cloning the inner [`ConnectionManager`] shares one multiplexed
/// connection; each operation clones it to obtain a mutable handle.
pub struct RedisBackend {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBackend").finish_non_exhaustive()
    }
}

impl RedisBackend {
    /// Connect to Redis at the given URL (e.g. `redis://127.0.0.1:6379`).
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(redis_err)?;
        let conn = ConnectionManager::new(client).await.map_err(redis_err)?;

        debug!(url = %url, "Redis backend initialized");

        Ok(Self { conn })
    }
}

fn redis_err(err: redis::RedisError) -> StoreError {
    if err.is_io_error()
        || err.is_timeout()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
    {
        StoreError::Connection(err.to_string())
    } else {
        StoreError::Protocol(err.to_string())
    }
}

#[async_trait]
impl KvClient for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(redis_err)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await.map_err(redis_err)?;
        Ok(())
    }

    fn scan(&self, pattern: &str, page_size: usize) -> KeyBatchStream<'_> {
        let mut conn = self.conn.clone();
        let pattern = pattern.to_string();

        Box::pin(try_stream! {
            let mut cursor: u64 = 0;
            loop {
                let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg(&pattern)
                    .arg("COUNT")
                    .arg(page_size)
                    .query_async(&mut conn)
                    .await
                    .map_err(redis_err)?;

                // SCAN may return empty pages mid-iteration; only non-empty
                // batches are surfaced to consumers.
                if !keys.is_empty() {
                    yield keys;
                }

                if next == 0 {
                    break;
                }
                cursor = next;
            }
        })
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await.map_err(redis_err)?;
        Ok(())
    }
}
