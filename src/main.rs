//! Wayfarer - offline cache worker for the travel planner.
//!
//! Intercepts the app's HTTP traffic and serves it from versioned cache
//! partitions so the planner keeps working with a flaky connection.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `cache` - Partitioned response storage with Moka
//! - `network` - Request/response model and the reqwest fetcher
//! - `strategy` - Cache-first, network-first, stale-while-revalidate and routing
//! - `worker` - Lifecycle, event handlers and the dispatch table
//! - `host` - The axum process the worker runs inside
//! - `utils` - Utility functions

mod cache;
mod config;
mod host;
mod network;
mod strategy;
mod utils;
mod worker;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use cache::CacheRegistry;
use config::Config;
use network::HttpFetcher;
use utils::SystemClock;
use worker::Worker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wayfarer=info,hyper=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting Wayfarer offline worker...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");
    info!("Cache version: {}", config.cache_version);
    info!("API freshness window: {:?}", config.api_freshness);

    let store = Arc::new(CacheRegistry::new());
    let fetcher = Arc::new(HttpFetcher::default());

    let worker = Worker::new(config.worker_settings()?, store, fetcher, Arc::new(SystemClock))?;
    info!("Partitions: {:?}", worker.names());

    let dispatcher = worker::build_dispatcher(Arc::new(worker));

    host::run(&config, dispatcher).await
}
