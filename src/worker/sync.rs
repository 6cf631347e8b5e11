//! Background sync.

use tracing::debug;

use super::Worker;

/// Tag the app registers when bookings were made offline.
pub const SYNC_BOOKINGS: &str = "sync-bookings";

impl Worker {
    /// Returns `true` for tags the worker recognises.
    ///
    /// `sync-bookings` is accepted but there is nothing to replay yet:
    /// offline bookings are not queued anywhere.
    pub async fn handle_sync(&self, tag: &str) -> bool {
        if tag == SYNC_BOOKINGS {
            debug!("Background sync {:?} received, nothing queued", tag);
            true
        } else {
            debug!("Ignoring unknown sync tag {:?}", tag);
            false
        }
    }
}
