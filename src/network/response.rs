//! Response snapshots.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Header recording when an API response was captured, in epoch millis.
pub const CACHED_AT_HEADER: &str = "sw-cached-at";

/// A fully buffered HTTP response.
///
/// The body is `Bytes`, so cloning a snapshot out of a partition is cheap.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode, body: Bytes) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn ok(body: Bytes) -> Self {
        Self::new(StatusCode::OK, body)
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Only exact 200 responses are ever written to a partition.
    pub fn is_cacheable(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Copy of this response carrying a capture-time stamp.
    pub fn stamped(&self, at: DateTime<Utc>) -> Self {
        let mut copy = self.clone();
        copy.headers.insert(
            HeaderName::from_static(CACHED_AT_HEADER),
            HeaderValue::from(at.timestamp_millis()),
        );
        copy
    }

    /// Capture time, if the snapshot was stamped with a readable value.
    pub fn cached_at(&self) -> Option<DateTime<Utc>> {
        let millis = self
            .headers
            .get(CACHED_AT_HEADER)?
            .to_str()
            .ok()?
            .parse::<i64>()
            .ok()?;
        DateTime::from_timestamp_millis(millis)
    }
}
