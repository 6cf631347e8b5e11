//! Install / activate.

use std::sync::atomic::Ordering;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{Worker, WorkerError, WorkerState};
use crate::network::{CacheMode, Request};

/// What install managed to pre-cache.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallReport {
    pub cached: Vec<String>,
    pub failed: Vec<String>,
}

/// What activation cleaned up.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivateReport {
    pub removed: Vec<String>,
    pub claimed: usize,
}

impl Worker {
    /// Pre-cache the static manifest, bypassing HTTP caches.
    ///
    /// A failing asset is logged and skipped; install always completes
    /// with whatever was fetched. There is no rollback.
    pub async fn install(&self) -> Result<InstallReport, WorkerError> {
        self.transition(WorkerState::Parsed, WorkerState::Installing)?;
        info!("Installing worker, pre-caching {} assets", self.manifest.len());

        let partition = &self.names.static_assets;
        self.store.open(partition);

        let fetches = self.manifest.iter().map(|url| async move {
            let request = Request::get(url.clone()).with_cache(CacheMode::Reload);
            let result = self.strategies.passthrough(&request).await;
            (request, result)
        });

        let mut report = InstallReport::default();
        for (request, result) in join_all(fetches).await {
            let key = request.key();
            match result {
                Ok(response) if response.is_cacheable() => {
                    self.store.put(partition, key.clone(), response);
                    report.cached.push(key.to_string());
                }
                Ok(response) => {
                    warn!("Failed to pre-cache {}: HTTP {}", key, response.status);
                    report.failed.push(key.to_string());
                }
                Err(e) => {
                    warn!("Failed to pre-cache {}: {}", key, e);
                    report.failed.push(key.to_string());
                }
            }
        }

        self.set_state(WorkerState::Installed);
        info!(
            "Worker installed ({} cached, {} failed)",
            report.cached.len(),
            report.failed.len()
        );

        if self.skip_waiting.load(Ordering::SeqCst) {
            debug!("Skip-waiting requested during install");
            self.activate_waiting()?;
        }

        Ok(report)
    }

    /// Drop every partition that is not one of the current three, then
    /// take control of all open clients.
    pub fn activate(&self) -> Result<ActivateReport, WorkerError> {
        self.transition(WorkerState::Installed, WorkerState::Activating)?;
        info!("Activating worker");

        let mut report = ActivateReport::default();
        for name in self.store.partitions() {
            if self.names.is_current(&name) {
                continue;
            }
            if self.store.delete_partition(&name) {
                info!("Deleting old partition: {}", name);
                report.removed.push(name);
            }
        }

        report.claimed = self.clients.claim();
        self.set_state(WorkerState::Activated);
        info!("Worker activated, controlling {} clients", report.claimed);

        Ok(report)
    }

    /// Activate without waiting. Returns `true` if this call activated.
    ///
    /// While installing, the request is remembered and honoured as soon as
    /// install finishes.
    pub fn skip_waiting(&self) -> Result<bool, WorkerError> {
        self.skip_waiting.store(true, Ordering::SeqCst);
        match self.state() {
            WorkerState::Installed => self.activate_waiting(),
            state => {
                debug!("Skip-waiting in state {}, nothing to do now", state);
                Ok(false)
            }
        }
    }

    /// Activate an installed worker. Losing the race to another activation
    /// is not an error; returns `true` only for the call that activated.
    fn activate_waiting(&self) -> Result<bool, WorkerError> {
        match self.activate() {
            Ok(_) => Ok(true),
            Err(WorkerError::InvalidTransition {
                from: WorkerState::Activating | WorkerState::Activated,
                ..
            }) => {
                debug!("Worker already activated elsewhere");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
