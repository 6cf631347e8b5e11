//! Stale-while-revalidate.

use std::sync::Arc;

use tracing::debug;

use super::FetchStrategies;
use crate::cache::CacheStore;
use crate::network::{FetchError, Fetcher, Request, Response};
use crate::utils::spawn_detached;

impl FetchStrategies {
    /// Return the cached snapshot right away and refresh it in the
    /// background; fresh content shows up on the next request.
    ///
    /// Only a miss waits on the network, and then a network failure is the
    /// result. A background refresh that fails is dropped silently.
    pub async fn stale_while_revalidate(
        &self,
        request: &Request,
        partition: &str,
    ) -> Result<Response, FetchError> {
        let cached = self.store.get(partition, &request.key());
        let refresh = revalidate(
            self.fetcher.clone(),
            self.store.clone(),
            request.clone(),
            partition.to_string(),
        );

        match cached {
            Some(hit) => {
                debug!("Serving stale {} while revalidating", request.url);
                spawn_detached("revalidation", refresh);
                Ok(hit)
            }
            None => refresh.await,
        }
    }
}

/// Fetch `request` and store a 200 in `partition`.
async fn revalidate(
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn CacheStore>,
    request: Request,
    partition: String,
) -> Result<Response, FetchError> {
    let response = fetcher.fetch(&request).await?;
    if response.is_cacheable() {
        store.put(&partition, request.key(), response.clone());
    }
    Ok(response)
}
