//! Cache module - partitioned response storage using Moka.
//!
//! ## Architecture
//!
//! - `CacheStore` - The interface strategies and lifecycle code use
//! - `CacheRegistry` - Holds every named partition; the only `CacheStore`
//! - `Partition` - One unbounded request → response map
//! - `PartitionNames` - The current version's static/dynamic/api names
//!
//! ## Usage
//!
//! ```rust
//! let store = CacheRegistry::new();
//! store.put("wayfarer-static-v1", key.clone(), response);
//! let hit = store.get("wayfarer-static-v1", &key);
//! ```

mod names;
mod partition;
mod registry;
mod store;

pub use names::{PartitionKind, PartitionNames};
pub use partition::Partition;
pub use registry::CacheRegistry;
pub use store::CacheStore;
