//! Versioned partition names.

use std::fmt;

/// The three partition classes the worker maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionKind {
    /// Bootstrap assets from the static manifest.
    Static,
    /// Everything served stale-while-revalidate.
    Dynamic,
    /// Data-service responses, stamped with their capture time.
    Api,
}

impl PartitionKind {
    pub const ALL: [PartitionKind; 3] = [Self::Static, Self::Dynamic, Self::Api];

    fn label(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
            Self::Api => "api",
        }
    }
}

impl fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Names of the current version's partitions.
///
/// Anything in the store that is not one of these three names is garbage
/// once the worker activates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionNames {
    pub static_assets: String,
    pub dynamic: String,
    pub api: String,
}

impl PartitionNames {
    /// Build names as `{prefix}-{kind}-{version}`.
    pub fn new(prefix: &str, version: &str) -> Self {
        let name = |kind: PartitionKind| format!("{}-{}-{}", prefix, kind, version);
        Self {
            static_assets: name(PartitionKind::Static),
            dynamic: name(PartitionKind::Dynamic),
            api: name(PartitionKind::Api),
        }
    }

    pub fn get(&self, kind: PartitionKind) -> &str {
        match kind {
            PartitionKind::Static => &self.static_assets,
            PartitionKind::Dynamic => &self.dynamic,
            PartitionKind::Api => &self.api,
        }
    }

    /// Whether `name` belongs to the current version.
    pub fn is_current(&self, name: &str) -> bool {
        PartitionKind::ALL.iter().any(|kind| self.get(*kind) == name)
    }
}

impl Default for PartitionNames {
    fn default() -> Self {
        Self::new("wayfarer", "v1")
    }
}
