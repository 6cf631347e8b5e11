//! Storage interface the worker and its strategies talk to.

use crate::network::{RequestKey, Response};

/// Partitioned response storage.
///
/// Each operation is individually atomic. There are no multi-key
/// transactions; concurrent writers to the same key race and the last
/// write wins.
pub trait CacheStore: Send + Sync {
    /// Look up a snapshot. A missing partition is simply a miss.
    fn get(&self, partition: &str, key: &RequestKey) -> Option<Response>;

    /// Store a snapshot, creating the partition on first write.
    fn put(&self, partition: &str, key: RequestKey, response: Response);

    /// Remove one entry. Returns `true` if it existed.
    fn delete(&self, partition: &str, key: &RequestKey) -> bool;

    /// Keys held by a partition; empty if the partition does not exist.
    fn keys(&self, partition: &str) -> Vec<RequestKey>;

    /// Create an empty partition if it does not exist yet.
    fn open(&self, partition: &str);

    /// Names of all existing partitions.
    fn partitions(&self) -> Vec<String>;

    /// Drop a whole partition. Returns `true` if it existed.
    fn delete_partition(&self, partition: &str) -> bool;
}
