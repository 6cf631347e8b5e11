//! Intercepted requests and their cache identity.

use std::fmt;

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap};
use url::Url;

/// How the request was issued by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    /// Top-level document load.
    Navigate,
    SameOrigin,
    #[default]
    Cors,
    NoCors,
}

/// HTTP cache interaction for outgoing fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    #[default]
    Default,
    /// Bypass any intermediate HTTP cache (force reload).
    Reload,
}

/// Identity of a request inside a partition: the URL without its fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey(String);

impl RequestKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Url> for RequestKey {
    fn from(url: &Url) -> Self {
        let mut url = url.clone();
        url.set_fragment(None);
        Self(url.into())
    }
}

impl From<&str> for RequestKey {
    fn from(s: &str) -> Self {
        match Url::parse(s) {
            Ok(url) => Self::from(&url),
            Err(_) => Self(s.to_string()),
        }
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An intercepted HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub mode: RequestMode,
    pub cache: CacheMode,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            mode: RequestMode::default(),
            cache: CacheMode::default(),
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// A top-level document load.
    pub fn navigate(url: Url) -> Self {
        Self::get(url).with_mode(RequestMode::Navigate)
    }

    #[must_use]
    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    pub fn key(&self) -> RequestKey {
        RequestKey::from(&self.url)
    }

    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }

    /// Infer the mode of a request that arrived over plain HTTP.
    ///
    /// Browsers send `Sec-Fetch-Mode`; older clients are treated as
    /// navigating when a GET asks for HTML.
    pub fn infer_mode(method: &Method, headers: &HeaderMap) -> RequestMode {
        let fetch_mode = headers
            .get("sec-fetch-mode")
            .and_then(|v| v.to_str().ok());

        match fetch_mode {
            Some("navigate") => RequestMode::Navigate,
            Some("same-origin") => RequestMode::SameOrigin,
            Some("no-cors") => RequestMode::NoCors,
            Some(_) => RequestMode::Cors,
            None => {
                let wants_html = headers
                    .get(ACCEPT)
                    .and_then(|v| v.to_str().ok())
                    .map(|accept| accept.starts_with("text/html"))
                    .unwrap_or(false);
                if *method == Method::GET && wants_html {
                    RequestMode::Navigate
                } else {
                    RequestMode::Cors
                }
            }
        }
    }
}
