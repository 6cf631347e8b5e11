//! Fetch interception.

use tracing::debug;

use super::{Worker, WorkerState};
use crate::network::{FetchError, Request, Response};
use crate::strategy::Route;

/// What the worker did with an intercepted request.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The worker produced the response.
    Respond(Response),
    /// Not handled; the host should go to the network as if uncontrolled.
    Passthrough,
}

impl Worker {
    /// Route a request to its strategy. Nothing is intercepted until the
    /// worker is activated.
    pub async fn handle_fetch(&self, request: &Request) -> Result<FetchOutcome, FetchError> {
        if self.state() != WorkerState::Activated {
            debug!("Worker not active, passing through {}", request.url);
            return Ok(FetchOutcome::Passthrough);
        }

        match self.router.classify(request) {
            Route::Passthrough(reason) => {
                debug!("Passing through {} {} ({:?})", request.method, request.url, reason);
                Ok(FetchOutcome::Passthrough)
            }
            Route::Handle {
                strategy,
                partition,
            } => {
                let name = self.names.get(partition);
                debug!("{:?} via {} for {}", strategy, name, request.url);
                self.strategies
                    .run(strategy, request, name)
                    .await
                    .map(FetchOutcome::Respond)
            }
        }
    }

    /// Plain network fetch for requests the worker passed through.
    pub async fn fetch_uncached(&self, request: &Request) -> Result<Response, FetchError> {
        self.strategies.passthrough(request).await
    }
}
