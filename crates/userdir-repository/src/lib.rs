//! # Userdir Repository
//!
//! Read-side access to user records in the external key-value store.
//!
//! The repository is the only component with non-trivial control flow: it
//! drives the store's scan cursor, aggregates batched point reads, and
//! decodes stored bytes into domain records. It never writes.

use std::sync::Arc;

use futures::TryStreamExt;
use tracing::debug;
use userdir_store::KvClient;
use userdir_types::User;

pub mod codec;
pub mod error;
pub mod keys;

pub use codec::DecodeError;
pub use error::{RepositoryError, RepositoryResult};

/// Keys requested per scan page during enumeration.
///
/// A tuning parameter only; enumeration results are identical for any
/// positive value.
const SCAN_PAGE_SIZE: usize = 2;

/// Repository for user records.
///
/// Holds a shared handle to the externally owned store connection. The
/// handle is injected at construction so tests can substitute a double.
pub struct UserRepository {
    client: Arc<dyn KvClient>,
}

impl UserRepository {
    /// Create a repository over a connected store client.
    pub fn new(client: Arc<dyn KvClient>) -> Self {
        Self { client }
    }

    /// Look up a single user by external identifier.
    ///
    /// Returns `Ok(None)` when no record is stored under the identifier;
    /// an unknown identifier is a normal outcome, not an error. Store
    /// failures and undecodable records propagate as errors and are never
    /// masked as absence.
    pub async fn get_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        let key = keys::user::by_id(id);

        match self.client.get(&key).await? {
            Some(bytes) => {
                let user = codec::decode(&bytes)
                    .map_err(|source| RepositoryError::Decode { key, source })?;
                Ok(Some(user))
            },
            None => Ok(None),
        }
    }

    /// Enumerate every stored user.
    ///
    /// Scans the user namespace in pages, then fetches and decodes the value
    /// for each listed key. Result order follows the scan's key order; no
    /// domain ordering is guaranteed. On any store or decode failure the
    /// whole operation fails and no partial collection is returned.
    pub async fn list_all(&self) -> RepositoryResult<Vec<User>> {
        let pattern = keys::user::all_pattern();
        let mut batches = self.client.scan(&pattern, SCAN_PAGE_SIZE);

        let mut users = Vec::new();
        while let Some(batch) = batches.try_next().await? {
            for key in batch {
                match self.client.get(&key).await? {
                    Some(bytes) => {
                        let user = codec::decode(&bytes)
                            .map_err(|source| RepositoryError::Decode { key, source })?;
                        users.push(user);
                    },
                    // Listed by the scan but gone by the fetch: a concurrent
                    // deletion. Skip the key; this branch must not absorb
                    // store or decode failures.
                    None => {
                        debug!(key = %key, "key vanished during enumeration, skipping");
                    },
                }
            }
        }

        debug!(count = users.len(), "Listed users");
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::stream;
    use userdir_store::{KeyBatchStream, MemoryBackend, StorageFactory};
    use userdir_types::{StoreError, StoreResult};

    use super::*;

    async fn seed(store: &dyn KvClient, user: &User) {
        let key = keys::user::by_id(&user.id.to_string());
        store.set(&key, codec::encode(user).unwrap()).await.unwrap();
    }

    /// Wraps a real backend and records every key passed to `get`.
    #[derive(Debug)]
    struct CountingClient {
        inner: MemoryBackend,
        get_keys: Mutex<Vec<String>>,
    }

    impl CountingClient {
        fn new(inner: MemoryBackend) -> Self {
            Self { inner, get_keys: Mutex::new(Vec::new()) }
        }

        fn get_keys(&self) -> Vec<String> {
            self.get_keys.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl KvClient for CountingClient {
        async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
            self.get_keys.lock().unwrap().push(key.to_string());
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
            self.inner.set(key, value).await
        }

        fn scan(&self, pattern: &str, page_size: usize) -> KeyBatchStream<'_> {
            self.inner.scan(pattern, page_size)
        }

        async fn ping(&self) -> StoreResult<()> {
            self.inner.ping().await
        }
    }

    /// Yields one good batch, then fails the scan.
    #[derive(Debug)]
    struct ScanFailsClient;

    #[async_trait]
    impl KvClient for ScanFailsClient {
        async fn get(&self, _key: &str) -> StoreResult<Option<Vec<u8>>> {
            Ok(Some(codec::encode(&User::new(1, "alpha")).unwrap()))
        }

        async fn set(&self, _key: &str, _value: Vec<u8>) -> StoreResult<()> {
            Ok(())
        }

        fn scan(&self, _pattern: &str, _page_size: usize) -> KeyBatchStream<'_> {
            Box::pin(stream::iter(vec![
                Ok(vec!["users:1".to_string()]),
                Err(StoreError::Connection("connection reset".to_string())),
            ]))
        }

        async fn ping(&self) -> StoreResult<()> {
            Ok(())
        }
    }

    /// Fails every point read.
    #[derive(Debug)]
    struct GetFailsClient;

    #[async_trait]
    impl KvClient for GetFailsClient {
        async fn get(&self, _key: &str) -> StoreResult<Option<Vec<u8>>> {
            Err(StoreError::Connection("connection refused".to_string()))
        }

        async fn set(&self, _key: &str, _value: Vec<u8>) -> StoreResult<()> {
            Ok(())
        }

        fn scan(&self, _pattern: &str, _page_size: usize) -> KeyBatchStream<'_> {
            Box::pin(stream::iter(vec![Ok(vec!["users:1".to_string()])]))
        }

        async fn ping(&self) -> StoreResult<()> {
            Ok(())
        }
    }

    /// Scan lists a key that no point read can find, as if deleted between
    /// the scan and the fetch.
    #[derive(Debug)]
    struct PhantomKeyClient {
        inner: MemoryBackend,
    }

    #[async_trait]
    impl KvClient for PhantomKeyClient {
        async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
            self.inner.set(key, value).await
        }

        fn scan(&self, _pattern: &str, _page_size: usize) -> KeyBatchStream<'_> {
            Box::pin(stream::iter(vec![Ok(vec![
                "users:1".to_string(),
                "users:2".to_string(),
                "users:3".to_string(),
            ])]))
        }

        async fn ping(&self) -> StoreResult<()> {
            self.inner.ping().await
        }
    }

    #[tokio::test]
    async fn test_get_by_id_absent_returns_none() {
        let repo = UserRepository::new(StorageFactory::memory());

        let result = repo.get_by_id("999").await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_get_by_id_returns_stored_record() {
        let store = MemoryBackend::new();
        seed(&store, &User::new(1, "alpha")).await;

        let repo = UserRepository::new(Arc::new(store));
        let user = repo.get_by_id("1").await.unwrap().unwrap();

        assert_eq!(user, User::new(1, "alpha"));
    }

    #[tokio::test]
    async fn test_get_by_id_uses_exact_key() {
        let client = Arc::new(CountingClient::new(MemoryBackend::new()));
        let repo = UserRepository::new(client.clone());

        repo.get_by_id("1").await.unwrap();

        assert_eq!(client.get_keys(), vec!["users:1".to_string()]);
    }

    #[tokio::test]
    async fn test_get_by_id_store_failure_is_not_absence() {
        let repo = UserRepository::new(Arc::new(GetFailsClient));

        let err = repo.get_by_id("1").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Store(StoreError::Connection(_))));
    }

    #[tokio::test]
    async fn test_get_by_id_malformed_record_fails() {
        let store = MemoryBackend::new();
        store.set("users:1", b"{not json".to_vec()).await.unwrap();

        let repo = UserRepository::new(Arc::new(store));
        let err = repo.get_by_id("1").await.unwrap_err();

        assert!(matches!(err, RepositoryError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_list_all_empty_store() {
        let repo = UserRepository::new(StorageFactory::memory());

        let users = repo.list_all().await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_list_all_spans_multiple_pages() {
        let client = Arc::new(CountingClient::new(MemoryBackend::new()));
        for (id, name) in [(1, "alpha"), (2, "bravo"), (3, "charlie"), (4, "delta")] {
            seed(client.as_ref(), &User::new(id, name)).await;
        }

        let repo = UserRepository::new(client.clone());
        let users = repo.list_all().await.unwrap();

        assert_eq!(
            users,
            vec![
                User::new(1, "alpha"),
                User::new(2, "bravo"),
                User::new(3, "charlie"),
                User::new(4, "delta"),
            ]
        );

        // One point read per listed key, no more.
        let mut keys = client.get_keys();
        keys.sort();
        assert_eq!(keys, vec!["users:1", "users:2", "users:3", "users:4"]);
    }

    #[tokio::test]
    async fn test_list_all_ignores_other_namespaces() {
        let store = MemoryBackend::new();
        seed(&store, &User::new(1, "alpha")).await;
        store.set("sessions:1", b"opaque".to_vec()).await.unwrap();

        let repo = UserRepository::new(Arc::new(store));
        let users = repo.list_all().await.unwrap();

        assert_eq!(users, vec![User::new(1, "alpha")]);
    }

    #[tokio::test]
    async fn test_list_all_scan_failure_yields_no_partial_result() {
        let repo = UserRepository::new(Arc::new(ScanFailsClient));

        let err = repo.list_all().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Store(StoreError::Connection(_))));
    }

    #[tokio::test]
    async fn test_list_all_get_failure_aborts() {
        let repo = UserRepository::new(Arc::new(GetFailsClient));

        let err = repo.list_all().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Store(_)));
    }

    #[tokio::test]
    async fn test_list_all_malformed_record_fails_whole_call() {
        let store = MemoryBackend::new();
        seed(&store, &User::new(1, "alpha")).await;
        store.set("users:2", b"{corrupt".to_vec()).await.unwrap();
        seed(&store, &User::new(3, "charlie")).await;

        let repo = UserRepository::new(Arc::new(store));
        let err = repo.list_all().await.unwrap_err();

        match err {
            RepositoryError::Decode { key, .. } => assert_eq!(key, "users:2"),
            other => panic!("expected Decode, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_all_skips_vanished_keys() {
        let inner = MemoryBackend::new();
        seed(&inner, &User::new(1, "alpha")).await;
        seed(&inner, &User::new(3, "charlie")).await;

        // users:2 is listed by the scan but absent from the store.
        let repo = UserRepository::new(Arc::new(PhantomKeyClient { inner }));
        let users = repo.list_all().await.unwrap();

        assert_eq!(users, vec![User::new(1, "alpha"), User::new(3, "charlie")]);
    }
}
