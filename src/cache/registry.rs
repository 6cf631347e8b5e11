//! Cache registry - Central management for all partitions.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use super::{CacheStore, Partition};
use crate::network::{RequestKey, Response};

/// Central registry holding every named partition.
///
/// The registry is the single owner of worker-scoped cache state; it is
/// passed explicitly to whatever needs it instead of living in a global.
///
/// ## Example
///
/// ```rust
/// let registry = CacheRegistry::new();
/// registry.open("wayfarer-static-v1");
/// assert_eq!(registry.partitions(), vec!["wayfarer-static-v1"]);
/// ```
#[derive(Clone)]
pub struct CacheRegistry {
    partitions: Arc<RwLock<HashMap<String, Partition>>>,
}

impl CacheRegistry {
    /// Create a new empty cache registry.
    pub fn new() -> Self {
        info!("Cache registry initialized");
        Self {
            partitions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get an existing partition by name.
    pub fn partition(&self, name: &str) -> Option<Partition> {
        self.partitions.read().get(name).cloned()
    }

    /// Get an existing partition or create an empty one.
    pub fn get_or_create(&self, name: &str) -> Partition {
        if let Some(partition) = self.partition(name) {
            return partition;
        }

        let mut partitions = self.partitions.write();
        // Another writer may have created it between the two locks.
        partitions
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!("Creating partition: {}", name);
                Partition::new(name)
            })
            .clone()
    }
}

impl CacheStore for CacheRegistry {
    fn get(&self, partition: &str, key: &RequestKey) -> Option<Response> {
        self.partition(partition)?.get(key)
    }

    fn put(&self, partition: &str, key: RequestKey, response: Response) {
        self.get_or_create(partition).put(key, response);
    }

    fn delete(&self, partition: &str, key: &RequestKey) -> bool {
        self.partition(partition)
            .map(|p| p.delete(key))
            .unwrap_or(false)
    }

    fn keys(&self, partition: &str) -> Vec<RequestKey> {
        self.partition(partition)
            .map(|p| p.keys())
            .unwrap_or_default()
    }

    fn open(&self, partition: &str) {
        self.get_or_create(partition);
    }

    fn partitions(&self) -> Vec<String> {
        let mut names: Vec<String> = self.partitions.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn delete_partition(&self, partition: &str) -> bool {
        let removed = self.partitions.write().remove(partition).is_some();
        if removed {
            debug!("Removed partition: {}", partition);
        }
        removed
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let partitions = self.partitions.read();
        f.debug_struct("CacheRegistry")
            .field("partition_count", &partitions.len())
            .field("partition_names", &partitions.keys().collect::<Vec<_>>())
            .finish()
    }
}
