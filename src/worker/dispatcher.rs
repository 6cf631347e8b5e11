//! Event dispatch table.
//!
//! Each event kind maps to one handler. Dispatch awaits the handler, so
//! the event is not considered settled until its work is done.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;

use super::events::{Event, EventKind, EventOutcome};
use super::Worker;

type Handler =
    Arc<dyn Fn(Arc<Worker>, Event) -> BoxFuture<'static, Result<EventOutcome>> + Send + Sync>;

/// Routes events to their handlers.
#[derive(Clone)]
pub struct EventDispatcher {
    worker: Arc<Worker>,
    handlers: HashMap<EventKind, Handler>,
}

impl EventDispatcher {
    pub fn new(worker: Arc<Worker>) -> Self {
        Self {
            worker,
            handlers: HashMap::new(),
        }
    }

    /// Register the handler for `kind`, replacing any previous one.
    #[must_use]
    pub fn on<F, Fut>(mut self, kind: EventKind, handler: F) -> Self
    where
        F: Fn(Arc<Worker>, Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<EventOutcome>> + Send + 'static,
    {
        let boxed: Handler = Arc::new(move |worker: Arc<Worker>, event: Event| {
            handler(worker, event).boxed()
        });
        self.handlers.insert(kind, boxed);
        self
    }

    pub fn worker(&self) -> &Arc<Worker> {
        &self.worker
    }

    pub async fn dispatch(&self, event: Event) -> Result<EventOutcome> {
        let kind = event.kind();
        let handler = self
            .handlers
            .get(&kind)
            .ok_or_else(|| anyhow!("no handler registered for {:?}", kind))?;
        debug!("Dispatching {:?}", kind);
        handler(self.worker.clone(), event).await
    }
}

/// Build the dispatcher with every handler the worker supports.
pub fn build_dispatcher(worker: Arc<Worker>) -> EventDispatcher {
    EventDispatcher::new(worker)
        .on(EventKind::Install, on_install)
        .on(EventKind::Activate, on_activate)
        .on(EventKind::Fetch, on_fetch)
        .on(EventKind::Message, on_message)
        .on(EventKind::Push, on_push)
        .on(EventKind::NotificationClick, on_notification_click)
        .on(EventKind::Sync, on_sync)
}

fn mismatched(expected: EventKind, event: &Event) -> anyhow::Error {
    anyhow!("{:?} handler received {:?} event", expected, event.kind())
}

async fn on_install(worker: Arc<Worker>, event: Event) -> Result<EventOutcome> {
    let Event::Install = event else {
        return Err(mismatched(EventKind::Install, &event));
    };
    Ok(EventOutcome::Installed(worker.install().await?))
}

async fn on_activate(worker: Arc<Worker>, event: Event) -> Result<EventOutcome> {
    let Event::Activate = event else {
        return Err(mismatched(EventKind::Activate, &event));
    };
    Ok(EventOutcome::Activated(worker.activate()?))
}

async fn on_fetch(worker: Arc<Worker>, event: Event) -> Result<EventOutcome> {
    let Event::Fetch(request) = event else {
        return Err(mismatched(EventKind::Fetch, &event));
    };
    Ok(EventOutcome::Fetch(worker.handle_fetch(&request).await?))
}

async fn on_message(worker: Arc<Worker>, event: Event) -> Result<EventOutcome> {
    let Event::Message(message) = event else {
        return Err(mismatched(EventKind::Message, &event));
    };
    Ok(EventOutcome::Message(worker.handle_message(&message)?))
}

async fn on_push(worker: Arc<Worker>, event: Event) -> Result<EventOutcome> {
    let Event::Push(payload) = event else {
        return Err(mismatched(EventKind::Push, &event));
    };
    Ok(EventOutcome::Push(worker.handle_push(&payload)))
}

async fn on_notification_click(worker: Arc<Worker>, event: Event) -> Result<EventOutcome> {
    let Event::NotificationClick(click) = event else {
        return Err(mismatched(EventKind::NotificationClick, &event));
    };
    Ok(EventOutcome::NotificationClick(
        worker.handle_notification_click(&click),
    ))
}

async fn on_sync(worker: Arc<Worker>, event: Event) -> Result<EventOutcome> {
    let Event::Sync(tag) = event else {
        return Err(mismatched(EventKind::Sync, &event));
    };
    let handled = worker.handle_sync(&tag).await;
    Ok(EventOutcome::Sync { tag, handled })
}
