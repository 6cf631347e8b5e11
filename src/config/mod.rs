//! Configuration module for the Wayfarer offline worker.
//!
//! Loads configuration from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use regex::Regex;
use url::Url;

use crate::cache::PartitionNames;
use crate::utils::{parse_duration, parse_list};
use crate::worker::WorkerSettings;

const DEFAULT_STATIC_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/offline.html",
    "/manifest.json",
    "/icons/icon-192x192.png",
    "/icons/icon-512x512.png",
];

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Origin the worker serves (same-origin requests are resolved against it).
    pub origin: Url,
    pub listen_addr: SocketAddr,

    // Partition naming
    pub cache_prefix: String,
    pub cache_version: String,

    /// How old an API snapshot may be and still be served when offline.
    pub api_freshness: Duration,
    pub api_path_pattern: String,
    /// Data-service hosts treated as API traffic (subdomains included).
    pub api_hosts: Vec<String>,

    pub static_assets: Vec<String>,
    pub offline_page: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let origin = env::var("WORKER_ORIGIN").context("WORKER_ORIGIN must be set")?;
        let origin = Url::parse(&origin).context("WORKER_ORIGIN is not a valid URL")?;
        if !matches!(origin.scheme(), "http" | "https") {
            bail!("WORKER_ORIGIN must be http or https, got {}", origin.scheme());
        }

        let listen_addr = env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("LISTEN_ADDR is not a socket address")?;

        let api_freshness = match env::var("API_FRESHNESS") {
            Ok(raw) => parse_duration(&raw)
                .with_context(|| format!("API_FRESHNESS {:?} is not a duration", raw))?,
            Err(_) => Duration::from_secs(300),
        };

        let api_hosts = env::var("API_HOSTS")
            .map(|s| parse_list(&s))
            .unwrap_or_else(|_| vec!["supabase.co".to_string()]);

        let static_assets = env::var("STATIC_ASSETS")
            .map(|s| parse_list(&s))
            .unwrap_or_else(|_| DEFAULT_STATIC_ASSETS.iter().map(|s| s.to_string()).collect());

        Ok(Self {
            origin,
            listen_addr,
            cache_prefix: env::var("CACHE_PREFIX").unwrap_or_else(|_| "wayfarer".to_string()),
            cache_version: env::var("CACHE_VERSION").unwrap_or_else(|_| "v1".to_string()),
            api_freshness,
            api_path_pattern: env::var("API_PATH_PATTERN").unwrap_or_else(|_| "/api/".to_string()),
            api_hosts,
            static_assets,
            offline_page: env::var("OFFLINE_PAGE").unwrap_or_else(|_| "/offline.html".to_string()),
        })
    }

    pub fn partition_names(&self) -> PartitionNames {
        PartitionNames::new(&self.cache_prefix, &self.cache_version)
    }

    /// Settings for the worker built from this config.
    pub fn worker_settings(&self) -> Result<WorkerSettings> {
        let api_path = Regex::new(&self.api_path_pattern)
            .with_context(|| {
                format!("API_PATH_PATTERN {:?} is not a valid regex", self.api_path_pattern)
            })?;

        Ok(WorkerSettings {
            origin: self.origin.clone(),
            names: self.partition_names(),
            static_assets: self.static_assets.clone(),
            offline_page: self.offline_page.clone(),
            api_freshness: self.api_freshness,
            api_path,
            api_hosts: self.api_hosts.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            origin: Url::parse("https://wayfarer.app").unwrap(),
            listen_addr: "127.0.0.1:8080".parse().unwrap(),
            cache_prefix: "wayfarer".to_string(),
            cache_version: "v4".to_string(),
            api_freshness: Duration::from_secs(300),
            api_path_pattern: "/api/".to_string(),
            api_hosts: vec!["supabase.co".to_string()],
            static_assets: DEFAULT_STATIC_ASSETS.iter().map(|s| s.to_string()).collect(),
            offline_page: "/offline.html".to_string(),
        }
    }

    #[test]
    fn test_worker_settings() {
        let settings = config().worker_settings().unwrap();
        assert_eq!(settings.names.api, "wayfarer-api-v4");
        assert!(settings.api_path.is_match("/api/trips"));
        assert_eq!(settings.static_assets.len(), DEFAULT_STATIC_ASSETS.len());
    }

    #[test]
    fn test_bad_pattern_is_rejected() {
        let mut config = config();
        config.api_path_pattern = "(".to_string();
        assert!(config.worker_settings().is_err());
    }
}
