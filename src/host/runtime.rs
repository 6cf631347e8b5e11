//! Host runtime - startup and serving.

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::routes;
use crate::config::Config;
use crate::worker::messages::WorkerMessage;
use crate::worker::{Event, EventDispatcher};

/// Serve the worker until Ctrl+C.
///
/// Install and activation run in the background; requests that arrive
/// before the worker is active go straight to the network.
pub async fn run(config: &Config, dispatcher: EventDispatcher) -> Result<()> {
    let startup = dispatcher.clone();
    tokio::spawn(async move {
        if let Err(e) = start_worker(&startup).await {
            error!("Worker failed to start: {:#}", e);
        }
    });

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("📡 Listening on: {}", config.listen_addr);
    info!("Serving origin: {}", config.origin);

    axum::serve(listener, routes::router(dispatcher))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Host stopped");
    Ok(())
}

/// Install, then activate right away: a fresh process has no previous
/// worker to wait for.
async fn start_worker(dispatcher: &EventDispatcher) -> Result<()> {
    dispatcher.dispatch(Event::Install).await?;
    dispatcher
        .dispatch(Event::Message(WorkerMessage::SkipWaiting))
        .await?;
    info!("✅ Worker is {}", dispatcher.worker().state());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
