//! Scriptable network for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::StatusCode;
use tokio::sync::Semaphore;

use super::{FetchError, Fetcher, Request, Response};

/// In-memory network with an on/off switch and an optional gate that
/// holds every fetch until released.
#[derive(Default)]
pub struct MockFetcher {
    routes: Mutex<HashMap<String, (StatusCode, Bytes)>>,
    offline: AtomicBool,
    calls: AtomicUsize,
    requests: Mutex<Vec<Request>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl MockFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, url: &str, status: StatusCode, body: &'static str) {
        self.routes
            .lock()
            .insert(url.to_string(), (status, Bytes::from_static(body.as_bytes())));
    }

    pub fn ok(&self, url: &str, body: &'static str) {
        self.respond(url, StatusCode::OK, body);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    /// Hold every subsequent fetch until `release` is called.
    pub fn hold(&self) {
        *self.gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release(&self) {
        if let Some(gate) = self.gate.lock().take() {
            gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await;
        }

        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::network(request.url.as_str(), "offline"));
        }

        let route = self.routes.lock().get(request.key().as_str()).cloned();
        Ok(match route {
            Some((status, body)) => Response::new(status, body),
            None => Response::new(StatusCode::NOT_FOUND, Bytes::new()),
        })
    }
}
