//! Events the worker responds to and what handling them produced.

use bytes::Bytes;

use super::messages::{MessageReply, WorkerMessage};
use super::push::{ClickOutcome, Notification, NotificationClick};
use super::{ActivateReport, FetchOutcome, InstallReport};
use crate::network::Request;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Install,
    Activate,
    Fetch,
    Message,
    Push,
    NotificationClick,
    Sync,
}

#[derive(Debug, Clone)]
pub enum Event {
    Install,
    Activate,
    Fetch(Request),
    Message(WorkerMessage),
    /// Raw push body.
    Push(Bytes),
    NotificationClick(NotificationClick),
    Sync(String),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Install => EventKind::Install,
            Self::Activate => EventKind::Activate,
            Self::Fetch(_) => EventKind::Fetch,
            Self::Message(_) => EventKind::Message,
            Self::Push(_) => EventKind::Push,
            Self::NotificationClick(_) => EventKind::NotificationClick,
            Self::Sync(_) => EventKind::Sync,
        }
    }
}

#[derive(Debug, Clone)]
pub enum EventOutcome {
    Installed(InstallReport),
    Activated(ActivateReport),
    Fetch(FetchOutcome),
    Message(MessageReply),
    Push(Notification),
    NotificationClick(ClickOutcome),
    Sync { tag: String, handled: bool },
}
