//! Network-first with a bounded-staleness fallback.

use std::time::Duration;

use chrono::TimeDelta;
use tracing::debug;

use super::FetchStrategies;
use crate::network::{FetchError, Request, Response};

impl FetchStrategies {
    /// Prefer the network. A 200 is stamped with its capture time and
    /// stored before the live response is returned.
    ///
    /// On network failure the snapshot is served only if it is younger than
    /// `window`; an older one is never served and the original failure is
    /// returned instead. Freshness is checked on this fallback path only,
    /// never while the network is answering.
    pub async fn network_first(
        &self,
        request: &Request,
        partition: &str,
        window: Duration,
    ) -> Result<Response, FetchError> {
        let key = request.key();

        let error = match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_cacheable() {
                    let stamped = response.stamped(self.clock.now());
                    self.store.put(partition, key, stamped);
                }
                return Ok(response);
            }
            Err(e) => e,
        };

        let Some(cached) = self.store.get(partition, &key) else {
            return Err(error);
        };

        // Unstamped entries count as infinitely old.
        let Some(cached_at) = cached.cached_at() else {
            debug!("Ignoring unstamped snapshot for {}", key);
            return Err(error);
        };

        let age = self.clock.now().signed_duration_since(cached_at);
        let window = TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX);

        if age < window {
            debug!("Network failed, serving {}s old snapshot for {}", age.num_seconds(), key);
            Ok(cached)
        } else {
            debug!("Snapshot for {} is stale ({}s), propagating failure", key, age.num_seconds());
            Err(error)
        }
    }
}
