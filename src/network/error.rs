//! Fetch errors.

use thiserror::Error;

/// Failure of a single network attempt.
///
/// Only transport-level failures are errors. An HTTP response with a
/// non-200 status is still a response; it is just never cached.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("network request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("invalid request for {url}: {reason}")]
    InvalidRequest { url: String, reason: String },
}

impl FetchError {
    pub fn network(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Network {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
