//! Worker module - the offline cache worker and its event handlers.
//!
//! - `lifecycle` - install / activate / skip-waiting
//! - `fetch` - fetch interception
//! - `messages` - `SKIP_WAITING` / `CLEAR_CACHE` control messages
//! - `push` - push payloads and notifications
//! - `clients` - window clients the worker controls
//! - `sync` - background sync tags
//! - `dispatcher` - event kind → handler table

pub mod clients;
pub mod dispatcher;
pub mod events;
mod fetch;
mod lifecycle;
pub mod messages;
pub mod push;
mod sync;

pub use dispatcher::{EventDispatcher, build_dispatcher};
pub use events::{Event, EventOutcome};
pub use fetch::FetchOutcome;
pub use lifecycle::{ActivateReport, InstallReport};

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use parking_lot::RwLock;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::cache::{CacheStore, PartitionNames};
use crate::network::{Fetcher, RequestKey};
use crate::strategy::{FetchStrategies, OfflineFallback, Router};
use crate::utils::Clock;
use clients::{ClientRegistry, WindowClient};
use push::{Notification, NotificationCenter};

/// Lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Parsed,
    Installing,
    /// Installed and waiting to activate.
    Installed,
    Activating,
    /// Activated and serving fetches.
    Activated,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Parsed => "parsed",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Activating => "activating",
            Self::Activated => "activated",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("cannot move worker from {from} to {to}")]
    InvalidTransition { from: WorkerState, to: WorkerState },

    #[error("invalid asset path {path:?}: {source}")]
    InvalidAsset {
        path: String,
        #[source]
        source: url::ParseError,
    },
}

/// Static settings for one worker version.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub origin: Url,
    pub names: PartitionNames,
    /// Same-origin paths pre-cached on install and served cache-first.
    pub static_assets: Vec<String>,
    pub offline_page: String,
    pub api_freshness: Duration,
    pub api_path: Regex,
    pub api_hosts: Vec<String>,
}

/// Snapshot of a partition for status reporting.
#[derive(Debug, Clone, Serialize)]
pub struct PartitionStatus {
    pub name: String,
    pub entries: usize,
}

/// Snapshot of the whole worker for status reporting.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerStatus {
    pub state: WorkerState,
    pub partitions: Vec<PartitionStatus>,
    pub notifications: Vec<Notification>,
    pub clients: Vec<WindowClient>,
}

/// The offline cache worker.
///
/// Holds its cache store explicitly; nothing here is global.
pub struct Worker {
    names: PartitionNames,
    manifest: Vec<Url>,
    store: Arc<dyn CacheStore>,
    strategies: FetchStrategies,
    router: Router,
    state: RwLock<WorkerState>,
    skip_waiting: AtomicBool,
    clients: ClientRegistry,
    notifications: NotificationCenter,
}

impl Worker {
    pub fn new(
        settings: WorkerSettings,
        store: Arc<dyn CacheStore>,
        fetcher: Arc<dyn Fetcher>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, WorkerError> {
        let join = |path: &str| {
            settings
                .origin
                .join(path)
                .map_err(|source| WorkerError::InvalidAsset {
                    path: path.to_string(),
                    source,
                })
        };

        let manifest = settings
            .static_assets
            .iter()
            .map(|path| join(path))
            .collect::<Result<Vec<_>, _>>()?;

        let offline = OfflineFallback {
            partition: settings.names.static_assets.clone(),
            key: RequestKey::from(&join(&settings.offline_page)?),
        };

        let strategies = FetchStrategies::new(
            store.clone(),
            fetcher,
            clock,
            offline,
            settings.api_freshness,
        );

        let router = Router::new(
            settings.origin.clone(),
            settings.api_path.clone(),
            settings.api_hosts.clone(),
            &settings.static_assets,
        );

        Ok(Self {
            names: settings.names,
            manifest,
            store,
            strategies,
            router,
            state: RwLock::new(WorkerState::Parsed),
            skip_waiting: AtomicBool::new(false),
            clients: ClientRegistry::new(),
            notifications: NotificationCenter::new(),
        })
    }

    pub fn state(&self) -> WorkerState {
        *self.state.read()
    }

    pub fn origin(&self) -> &Url {
        self.router.origin()
    }

    pub fn names(&self) -> &PartitionNames {
        &self.names
    }

    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Move from `from` to `to`, failing if the worker is elsewhere.
    fn transition(&self, from: WorkerState, to: WorkerState) -> Result<(), WorkerError> {
        let mut state = self.state.write();
        if *state != from {
            return Err(WorkerError::InvalidTransition { from: *state, to });
        }
        *state = to;
        Ok(())
    }

    fn set_state(&self, to: WorkerState) {
        *self.state.write() = to;
    }

    pub fn status(&self) -> WorkerStatus {
        let partitions = self
            .store
            .partitions()
            .into_iter()
            .map(|name| PartitionStatus {
                entries: self.store.keys(&name).len(),
                name,
            })
            .collect();

        WorkerStatus {
            state: self.state(),
            partitions,
            notifications: self.notifications.list(),
            clients: self.clients.list(),
        }
    }
}

impl fmt::Debug for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("state", &self.state())
            .field("names", &self.names)
            .field("manifest_len", &self.manifest.len())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use regex::Regex;
    use url::Url;

    use super::{Worker, WorkerSettings};
    use crate::cache::{CacheRegistry, PartitionNames};
    use crate::network::mock::MockFetcher;
    use crate::utils::clock::ManualClock;

    pub struct Fixture {
        pub worker: Arc<Worker>,
        pub store: Arc<CacheRegistry>,
        pub network: Arc<MockFetcher>,
    }

    pub fn settings() -> WorkerSettings {
        WorkerSettings {
            origin: Url::parse("https://wayfarer.app").unwrap(),
            names: PartitionNames::new("wayfarer", "v2"),
            static_assets: vec![
                "/".to_string(),
                "/index.html".to_string(),
                "/offline.html".to_string(),
                "/manifest.json".to_string(),
            ],
            offline_page: "/offline.html".to_string(),
            api_freshness: Duration::from_secs(300),
            api_path: Regex::new("/api/").unwrap(),
            api_hosts: vec!["supabase.co".to_string()],
        }
    }

    /// A worker whose network serves every manifest entry.
    pub fn fixture() -> Fixture {
        let store = Arc::new(CacheRegistry::new());
        let network = MockFetcher::new();
        network.ok("https://wayfarer.app/", "<html>home</html>");
        network.ok("https://wayfarer.app/index.html", "<html>home</html>");
        network.ok("https://wayfarer.app/offline.html", "<html>offline</html>");
        network.ok("https://wayfarer.app/manifest.json", "{}");

        let clock = Arc::new(ManualClock::at(chrono::Utc::now()));
        let worker = Worker::new(settings(), store.clone(), network.clone(), clock).unwrap();

        Fixture {
            worker: Arc::new(worker),
            store,
            network,
        }
    }

    /// A fixture that has already been installed and activated.
    pub async fn active_fixture() -> Fixture {
        let f = fixture();
        f.worker.install().await.unwrap();
        f.worker.activate().unwrap();
        f
    }
}
