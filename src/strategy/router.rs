//! Request classification.
//!
//! A static decision table: the same request always gets the same route.

use std::collections::HashSet;

use regex::Regex;
use reqwest::Method;
use url::Url;

use super::Strategy;
use crate::cache::PartitionKind;
use crate::network::Request;

/// Why a request is left to the network untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReason {
    NotGet,
    UnsupportedScheme,
    ForeignOrigin,
}

/// Outcome of classifying a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Passthrough(PassReason),
    Handle {
        strategy: Strategy,
        partition: PartitionKind,
    },
}

impl Route {
    const API: Route = Route::Handle {
        strategy: Strategy::NetworkFirst,
        partition: PartitionKind::Api,
    };
    const STATIC: Route = Route::Handle {
        strategy: Strategy::CacheFirst,
        partition: PartitionKind::Static,
    };
    const DYNAMIC: Route = Route::Handle {
        strategy: Strategy::StaleWhileRevalidate,
        partition: PartitionKind::Dynamic,
    };
}

/// Classifies intercepted requests by URL shape.
#[derive(Debug, Clone)]
pub struct Router {
    origin: Url,
    api_path: Regex,
    api_hosts: Vec<String>,
    static_paths: HashSet<String>,
}

impl Router {
    pub fn new(
        origin: Url,
        api_path: Regex,
        api_hosts: Vec<String>,
        static_assets: &[String],
    ) -> Self {
        Self {
            origin,
            api_path,
            api_hosts: api_hosts.into_iter().map(|h| h.to_lowercase()).collect(),
            static_paths: static_assets.iter().cloned().collect(),
        }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn classify(&self, request: &Request) -> Route {
        if request.method != Method::GET {
            return Route::Passthrough(PassReason::NotGet);
        }

        let url = &request.url;
        if !matches!(url.scheme(), "http" | "https") {
            return Route::Passthrough(PassReason::UnsupportedScheme);
        }

        let same_origin = url.origin() == self.origin.origin();
        let data_service = self.is_data_service(url);

        if !same_origin && !data_service {
            return Route::Passthrough(PassReason::ForeignOrigin);
        }

        if data_service || self.api_path.is_match(url.path()) {
            return Route::API;
        }

        if self.static_paths.contains(url.path()) {
            return Route::STATIC;
        }

        Route::DYNAMIC
    }

    /// Host equals a known data-service host or is a subdomain of one.
    fn is_data_service(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_lowercase();
        self.api_hosts
            .iter()
            .any(|known| host == *known || host.ends_with(&format!(".{}", known)))
    }
}
