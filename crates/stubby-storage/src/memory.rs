use async_trait::async_trait;
use dashmap::DashMap;
use stubby_core::store::{LinkStore, ReadStore, Result};
use stubby_core::{LinkRecord, ShortCode};
use tracing::trace;

/// In-memory implementation of the storage port using DashMap.
///
/// Records live as long as the store does; nothing survives a restart.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    storage: DashMap<String, LinkRecord>,
}

impl InMemoryStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadStore for InMemoryStore {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        Ok(self
            .storage
            .get(code.as_str())
            .map(|entry| entry.value().clone()))
    }

    async fn list_all(&self) -> Result<Vec<LinkRecord>> {
        Ok(self
            .storage
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }
}

#[async_trait]
impl LinkStore for InMemoryStore {
    async fn put(&self, record: LinkRecord) -> Result<()> {
        trace!(code = %record.code, clicks = record.clicks, "storing link record");
        self.storage.insert(record.code.as_str().to_owned(), record);
        Ok(())
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.storage.remove(code.as_str()).is_some())
    }
}
