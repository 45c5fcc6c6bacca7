//! # Userdir Store - Storage Abstraction Layer
//!
//! Provides the client contract for the external key-value store and the
//! available backend implementations.

use async_trait::async_trait;
use futures::stream::BoxStream;
use userdir_types::StoreResult;

pub mod factory;
pub mod memory;
pub mod redis_backend;

pub use factory::{BackendType, StorageConfig, StorageFactory};
pub use memory::MemoryBackend;
pub use redis_backend::RedisBackend;

type Result<T> = StoreResult<T>;

/// A lazy, finite sequence of key batches produced by a scan.
///
/// The underlying cursor is owned by the backend; consumers only pull
/// successive batches until the stream ends. The stream is not restartable.
pub type KeyBatchStream<'a> = BoxStream<'a, Result<Vec<String>>>;

/// The abstract key-value store client.
///
/// The connected client is a shared, long-lived resource owned by the
/// process; it is safe for concurrent use and is never closed by consumers.
#[async_trait]
pub trait KvClient: Send + Sync + std::fmt::Debug {
    /// Read the value stored under a key.
    ///
    /// Returns `None` when the key is absent; absence is a normal outcome,
    /// not an error.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store a value under a key, replacing any existing value.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Enumerate keys matching a glob pattern in batches of at most
    /// `page_size` keys.
    ///
    /// The stream may fail mid-iteration with a
    /// [`StoreError`](userdir_types::StoreError) on connectivity failure.
    fn scan(&self, pattern: &str, page_size: usize) -> KeyBatchStream<'_>;

    /// Probe store connectivity.
    async fn ping(&self) -> Result<()>;
}
