//! Cache-first: a hit always short-circuits.

use tracing::{debug, warn};

use super::FetchStrategies;
use crate::network::{FetchError, Request, Response};

impl FetchStrategies {
    /// Serve the cached snapshot if there is one; otherwise go to the
    /// network and keep a copy of a 200.
    ///
    /// A hit never consults the network, so entries here are never
    /// refreshed. On network failure a navigation degrades to the offline
    /// page; anything else gets the failure.
    pub async fn cache_first(
        &self,
        request: &Request,
        partition: &str,
    ) -> Result<Response, FetchError> {
        let key = request.key();

        if let Some(hit) = self.store.get(partition, &key) {
            debug!("Cache hit in {}: {}", partition, key);
            return Ok(hit);
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_cacheable() {
                    self.store.put(partition, key, response.clone());
                }
                Ok(response)
            }
            Err(e) => {
                if request.is_navigation()
                    && let Some(page) = self.offline_page()
                {
                    warn!("Serving offline page for {}: {}", key, e);
                    return Ok(page);
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;
    use reqwest::StatusCode;
    use url::Url;

    use super::super::test_support::{STATIC, harness};
    use crate::cache::CacheStore;
    use crate::network::{Request, RequestKey, Response};

    fn url(path: &str) -> Url {
        Url::parse("https://app.test").unwrap().join(path).unwrap()
    }

    #[tokio::test]
    async fn test_hit_never_touches_network() {
        let h = harness(Duration::from_secs(300));
        h.network.ok("https://app.test/manifest.json", "{\"name\":\"wayfarer\"}");

        let first = h
            .strategies
            .cache_first(&Request::get(url("/manifest.json")), STATIC)
            .await
            .unwrap();
        assert_eq!(first.body, Bytes::from_static(b"{\"name\":\"wayfarer\"}"));
        assert_eq!(h.network.calls(), 1);

        h.network.set_offline(true);
        for _ in 0..3 {
            let again = h
                .strategies
                .cache_first(&Request::get(url("/manifest.json")), STATIC)
                .await
                .unwrap();
            assert_eq!(again.body, first.body);
        }
        assert_eq!(h.network.calls(), 1);
    }

    #[tokio::test]
    async fn test_non_200_is_returned_but_not_stored() {
        let h = harness(Duration::from_secs(300));
        h.network.respond("https://app.test/index.html", StatusCode::SERVICE_UNAVAILABLE, "down");

        let response = h
            .strategies
            .cache_first(&Request::get(url("/index.html")), STATIC)
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(h.store.keys(STATIC).is_empty());
    }

    #[tokio::test]
    async fn test_navigation_falls_back_to_offline_page() {
        let h = harness(Duration::from_secs(300));
        h.store.put(
            STATIC,
            RequestKey::from("https://app.test/offline.html"),
            Response::ok(Bytes::from_static(b"<h1>offline</h1>")),
        );
        h.network.set_offline(true);

        let response = h
            .strategies
            .cache_first(&Request::navigate(url("/")), STATIC)
            .await
            .unwrap();
        assert_eq!(response.body, Bytes::from_static(b"<h1>offline</h1>"));
    }

    #[tokio::test]
    async fn test_subresource_miss_propagates_failure() {
        let h = harness(Duration::from_secs(300));
        h.store.put(
            STATIC,
            RequestKey::from("https://app.test/offline.html"),
            Response::ok(Bytes::from_static(b"<h1>offline</h1>")),
        );
        h.network.set_offline(true);

        let result = h
            .strategies
            .cache_first(&Request::get(url("/icons/icon-192x192.png")), STATIC)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_navigation_without_offline_page_propagates() {
        let h = harness(Duration::from_secs(300));
        h.network.set_offline(true);

        let result = h
            .strategies
            .cache_first(&Request::navigate(url("/")), STATIC)
            .await;
        assert!(result.is_err());
    }
}
