//! Storage factory for creating backend instances
//!
//! Provides a flexible way to instantiate different storage backends
//! without exposing implementation details to consumers.

use std::str::FromStr;
use std::sync::Arc;

use userdir_types::StoreError;

use crate::memory::MemoryBackend;
use crate::redis_backend::RedisBackend;
use crate::{KvClient, Result};

/// Storage backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// In-memory storage (for testing and development)
    Memory,
    /// Redis storage (for production)
    Redis,
}

impl FromStr for BackendType {
    type Err = StoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(BackendType::Memory),
            "redis" => Ok(BackendType::Redis),
            _ => Err(StoreError::Internal(format!("unknown backend type: {}", s))),
        }
    }
}

impl BackendType {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Memory => "memory",
            BackendType::Redis => "redis",
        }
    }
}

/// Configuration for storage backend
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Backend type to use
    pub backend: BackendType,
    /// Optional connection string (for database backends)
    pub connection_string: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: BackendType::Memory, connection_string: None }
    }
}

impl StorageConfig {
    /// Create config for memory backend
    pub fn memory() -> Self {
        Self { backend: BackendType::Memory, connection_string: None }
    }

    /// Create config for Redis backend
    pub fn redis(connection_string: impl Into<String>) -> Self {
        Self { backend: BackendType::Redis, connection_string: Some(connection_string.into()) }
    }
}

/// Storage factory for creating backend instances
pub struct StorageFactory;

impl StorageFactory {
    /// Create a storage backend from configuration
    pub async fn create(config: StorageConfig) -> Result<Arc<dyn KvClient>> {
        match config.backend {
            BackendType::Memory => Ok(Arc::new(MemoryBackend::new()) as Arc<dyn KvClient>),
            BackendType::Redis => {
                let url = config.connection_string.as_deref().ok_or_else(|| {
                    StoreError::Internal(
                        "redis backend requires a connection string".to_string(),
                    )
                })?;
                let backend = RedisBackend::connect(url).await?;
                Ok(Arc::new(backend) as Arc<dyn KvClient>)
            },
        }
    }

    /// Create a storage backend from string configuration
    pub async fn from_str(
        backend_str: &str,
        connection_string: Option<String>,
    ) -> Result<Arc<dyn KvClient>> {
        let backend = BackendType::from_str(backend_str)?;
        Self::create(StorageConfig { backend, connection_string }).await
    }

    /// Create default memory backend
    pub fn memory() -> Arc<dyn KvClient> {
        Arc::new(MemoryBackend::new()) as Arc<dyn KvClient>
    }
}
