//! Network fetcher backed by reqwest.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use tracing::debug;

use super::{CacheMode, FetchError, Request, Response};

/// Something that can perform a single network attempt.
///
/// No retries and no timeouts: one failure is final for that request, and
/// a request that never completes stays pending.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

/// Headers that only make sense for a single hop.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

fn strip_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    let mut out = headers.clone();
    for name in HOP_BY_HOP {
        out.remove(*name);
    }
    out
}

/// Headers sent upstream: hop-by-hop headers dropped, cache bypass
/// requested for reloads.
fn outgoing_headers(request: &Request) -> HeaderMap {
    let mut headers = strip_hop_by_hop(&request.headers);
    if request.cache == CacheMode::Reload {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    }
    headers
}

/// Real network access.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        let url = request.url.as_str();

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(outgoing_headers(request));
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let built = builder.build().map_err(|e| FetchError::InvalidRequest {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .execute(built)
            .await
            .map_err(|e| FetchError::network(url, e))?;

        let status = response.status();
        let headers = strip_hop_by_hop(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(url, e))?;

        debug!("{} {} -> {}", request.method, url, status);

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
