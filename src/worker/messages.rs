//! Control messages posted to the worker.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Worker, WorkerError};

/// Commands a page can post to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessage {
    /// Activate now instead of waiting.
    SkipWaiting,
    /// Delete every partition, whatever its version.
    ClearCache,
    #[serde(other)]
    Unknown,
}

/// Reply to a control message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MessageReply {
    SkipWaiting { activated: bool },
    CacheCleared { removed: Vec<String> },
    Ignored,
}

impl Worker {
    pub fn handle_message(&self, message: &WorkerMessage) -> Result<MessageReply, WorkerError> {
        match message {
            WorkerMessage::SkipWaiting => {
                let activated = self.skip_waiting()?;
                Ok(MessageReply::SkipWaiting { activated })
            }
            WorkerMessage::ClearCache => Ok(MessageReply::CacheCleared {
                removed: self.clear_all(),
            }),
            WorkerMessage::Unknown => {
                debug!("Ignoring unknown worker message");
                Ok(MessageReply::Ignored)
            }
        }
    }

    /// Drop every partition. Safe to call on an empty store.
    fn clear_all(&self) -> Vec<String> {
        let removed: Vec<String> = self
            .store
            .partitions()
            .into_iter()
            .filter(|name| self.store.delete_partition(name))
            .collect();
        info!("Cleared {} partitions", removed.len());
        removed
    }
}
