//! In-memory storage backend for testing and development

use std::collections::BTreeMap;
use std::sync::Arc;

use async_stream::try_stream;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{KeyBatchStream, KvClient, Result};

/// In-memory key-value store implementation.
///
/// Keys are held in a `BTreeMap`, so scans enumerate them in lexicographic
/// order. A scan snapshots the matching keys when the first batch is pulled;
/// writes that land afterwards are not observed by that scan.
#[derive(Debug)]
pub struct MemoryBackend {
    data: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self { data: Arc::new(RwLock::new(BTreeMap::new())) }
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// True when no keys are stored.
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvClient for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut data = self.data.write().await;
        data.insert(key.to_string(), value);
        Ok(())
    }

    fn scan(&self, pattern: &str, page_size: usize) -> KeyBatchStream<'_> {
        let data = Arc::clone(&self.data);
        let pattern = pattern.to_string();
        let page_size = page_size.max(1);

        Box::pin(try_stream! {
            let keys: Vec<String> = {
                let data = data.read().await;
                data.keys().filter(|key| pattern_matches(&pattern, key)).cloned().collect()
            };

            for page in keys.chunks(page_size) {
                yield page.to_vec();
            }
        })
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Glob match supporting `*` (any run of characters) and `?` (any single
/// character), the subset Redis `SCAN MATCH` patterns use here.
fn pattern_matches(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();

    // Iterative matcher with single-star backtracking.
    let (mut p, mut k) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while k < key.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == key[k]) {
            p += 1;
            k += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, k));
            p += 1;
        } else if let Some((star_p, star_k)) = star {
            p = star_p + 1;
            k = star_k + 1;
            star = Some((star_p, star_k + 1));
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }

    p == pattern.len()
}
