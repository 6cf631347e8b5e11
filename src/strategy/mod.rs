//! Fetch strategies and the routing table that picks one per request.
//!
//! - `router` - Static classification of a request into a `Route`
//! - `cache_first` - Serve from cache, consult the network only on a miss
//! - `network_first` - Prefer live data, fall back to a fresh-enough snapshot
//! - `stale_while_revalidate` - Serve the snapshot now, refresh it in the background

mod cache_first;
mod network_first;
mod router;
mod stale_while_revalidate;

pub use router::{Route, Router};

use std::sync::Arc;
use std::time::Duration;

use crate::cache::CacheStore;
use crate::network::{FetchError, Fetcher, Request, RequestKey, Response};
use crate::utils::Clock;

/// The three fetch strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    CacheFirst,
    NetworkFirst,
    StaleWhileRevalidate,
}

/// Where to find the page served to navigations when the network is gone.
#[derive(Debug, Clone)]
pub struct OfflineFallback {
    pub partition: String,
    pub key: RequestKey,
}

/// Everything a strategy needs: storage, network, time.
#[derive(Clone)]
pub struct FetchStrategies {
    store: Arc<dyn CacheStore>,
    fetcher: Arc<dyn Fetcher>,
    clock: Arc<dyn Clock>,
    offline: OfflineFallback,
    api_freshness: Duration,
}

impl FetchStrategies {
    pub fn new(
        store: Arc<dyn CacheStore>,
        fetcher: Arc<dyn Fetcher>,
        clock: Arc<dyn Clock>,
        offline: OfflineFallback,
        api_freshness: Duration,
    ) -> Self {
        Self {
            store,
            fetcher,
            clock,
            offline,
            api_freshness,
        }
    }

    /// Run `strategy` for `request` against `partition`.
    pub async fn run(
        &self,
        strategy: Strategy,
        request: &Request,
        partition: &str,
    ) -> Result<Response, FetchError> {
        match strategy {
            Strategy::CacheFirst => self.cache_first(request, partition).await,
            Strategy::NetworkFirst => {
                self.network_first(request, partition, self.api_freshness)
                    .await
            }
            Strategy::StaleWhileRevalidate => {
                self.stale_while_revalidate(request, partition).await
            }
        }
    }

    /// Plain network access, used for requests the worker does not handle.
    pub async fn passthrough(&self, request: &Request) -> Result<Response, FetchError> {
        self.fetcher.fetch(request).await
    }

    fn offline_page(&self) -> Option<Response> {
        self.store.get(&self.offline.partition, &self.offline.key)
    }
}
