//! Background task helpers.

use std::fmt::Display;
use std::future::Future;

use tokio::task::JoinHandle;
use tracing::debug;

/// Spawn a fire-and-forget task whose failure is logged and dropped.
///
/// The caller never observes the outcome; nothing is retried.
pub fn spawn_detached<F, T, E>(label: &'static str, fut: F) -> JoinHandle<()>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = fut.await {
            debug!("Background {} failed: {}", label, e);
        }
    })
}
