//! A single named partition backed by Moka.

use std::sync::Arc;

use moka::sync::Cache;

use crate::network::{RequestKey, Response};

/// One isolated request-identity → response-snapshot store.
///
/// Partitions are unbounded and never expire on their own: entries are
/// only replaced by a newer write or dropped with the whole partition.
/// Cloning is cheap and shares the same underlying map.
#[derive(Clone)]
pub struct Partition {
    inner: Arc<Cache<RequestKey, Response>>,
    name: Arc<str>,
}

impl Partition {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            inner: Arc::new(Cache::builder().build()),
            name: name.into(),
        }
    }

    /// Store a snapshot, overwriting any previous entry (last write wins).
    pub fn put(&self, key: RequestKey, response: Response) {
        self.inner.insert(key, response);
    }

    pub fn get(&self, key: &RequestKey) -> Option<Response> {
        self.inner.get(key)
    }

    /// Remove a single entry. Returns `true` if something was removed.
    pub fn delete(&self, key: &RequestKey) -> bool {
        self.inner.remove(key).is_some()
    }

    pub fn keys(&self) -> Vec<RequestKey> {
        let mut keys: Vec<RequestKey> = self.inner.iter().map(|(k, _)| (*k).clone()).collect();
        keys.sort();
        keys
    }
}

impl std::fmt::Debug for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Partition")
            .field("name", &self.name)
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}
