//! Push payloads and notifications.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::Worker;

const DEFAULT_TITLE: &str = "Wayfarer";
const DEFAULT_BODY: &str = "You have a new travel update";
const DEFAULT_TAG: &str = "wayfarer-notification";
const ICON: &str = "/icons/icon-192x192.png";
const BADGE: &str = "/icons/icon-72x72.png";

/// Action that closes a notification without opening anything.
pub const DISMISS_ACTION: &str = "dismiss";

/// A button on a notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Incoming push body. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub tag: Option<String>,
    pub require_interaction: Option<bool>,
    pub actions: Option<Vec<NotificationAction>>,
    pub data: Option<Value>,
}

impl PushPayload {
    /// Parse a raw push body.
    ///
    /// Empty means all defaults. Anything that is not a valid payload object
    /// becomes the notification body as text.
    pub fn parse(raw: &[u8]) -> Self {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }

        match serde_json::from_slice::<PushPayload>(raw) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Push payload is not a JSON object ({}), using it as text", e);
                Self {
                    body: Some(String::from_utf8_lossy(raw).trim().to_string()),
                    ..Self::default()
                }
            }
        }
    }

    pub fn into_notification(self) -> Notification {
        Notification {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            body: self.body.unwrap_or_else(|| DEFAULT_BODY.to_string()),
            icon: ICON.to_string(),
            badge: BADGE.to_string(),
            tag: self.tag.unwrap_or_else(|| DEFAULT_TAG.to_string()),
            require_interaction: self.require_interaction.unwrap_or(false),
            actions: self.actions.unwrap_or_default(),
            data: self.data.unwrap_or_else(|| json!({ "url": "/" })),
        }
    }
}

/// A user-visible notification.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub tag: String,
    pub require_interaction: bool,
    pub actions: Vec<NotificationAction>,
    pub data: Value,
}

impl Notification {
    /// Path or URL to open on click.
    pub fn target(&self) -> &str {
        self.data
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or("/")
    }
}

/// Notifications currently on screen.
#[derive(Clone, Default)]
pub struct NotificationCenter {
    shown: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notification, replacing any with the same tag.
    pub fn show(&self, notification: Notification) {
        let mut shown = self.shown.lock();
        shown.retain(|n| n.tag != notification.tag);
        shown.push(notification);
    }

    pub fn close(&self, tag: &str) -> Option<Notification> {
        let mut shown = self.shown.lock();
        let index = shown.iter().position(|n| n.tag == tag)?;
        Some(shown.remove(index))
    }

    pub fn list(&self) -> Vec<Notification> {
        self.shown.lock().clone()
    }
}

/// A click on a notification or one of its actions.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationClick {
    pub tag: String,
    #[serde(default)]
    pub action: Option<String>,
}

/// What a click led to.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ClickOutcome {
    Dismissed,
    Focused { client: u64 },
    Opened { client: u64 },
}

impl Worker {
    /// Render a push payload as a notification.
    pub fn handle_push(&self, raw: &[u8]) -> Notification {
        let notification = PushPayload::parse(raw).into_notification();
        info!("Showing notification {:?}: {}", notification.tag, notification.title);
        self.notifications.show(notification.clone());
        notification
    }

    /// Close the clicked notification and bring its target into view:
    /// focus a window already showing it, or open a new one.
    pub fn handle_notification_click(&self, click: &NotificationClick) -> ClickOutcome {
        let notification = self.notifications.close(&click.tag);

        if click.action.as_deref() == Some(DISMISS_ACTION) {
            debug!("Notification {:?} dismissed", click.tag);
            return ClickOutcome::Dismissed;
        }

        let origin = self.router.origin();
        let target = notification
            .as_ref()
            .map(Notification::target)
            .and_then(|t| origin.join(t).ok())
            .unwrap_or_else(|| origin.clone());

        match self.clients.find_by_url(&target) {
            Some(client) => {
                self.clients.focus(client);
                ClickOutcome::Focused { client }
            }
            None => {
                let client = self.clients.open_window(target.clone());
                info!("Opened window {} for {}", client, target);
                ClickOutcome::Opened { client }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::super::test_support::{active_fixture, fixture};
    use super::*;

    #[test]
    fn test_empty_payload_uses_defaults() {
        let n = PushPayload::parse(b"").into_notification();
        assert_eq!(n.title, DEFAULT_TITLE);
        assert_eq!(n.body, DEFAULT_BODY);
        assert_eq!(n.tag, DEFAULT_TAG);
        assert!(!n.require_interaction);
        assert!(n.actions.is_empty());
        assert_eq!(n.target(), "/");
    }

    #[test]
    fn test_full_payload() {
        let raw = br#"{
            "title": "Flight delayed",
            "body": "KL1234 now departs 14:20",
            "tag": "flight-KL1234",
            "requireInteraction": true,
            "actions": [
                {"action": "view", "title": "View trip"},
                {"action": "dismiss", "title": "Dismiss"}
            ],
            "data": {"url": "/trips/7"}
        }"#;
        let n = PushPayload::parse(raw).into_notification();
        assert_eq!(n.title, "Flight delayed");
        assert_eq!(n.tag, "flight-KL1234");
        assert!(n.require_interaction);
        assert_eq!(n.actions.len(), 2);
        assert_eq!(n.target(), "/trips/7");
    }

    #[test]
    fn test_partial_payload_fills_defaults() {
        let n = PushPayload::parse(br#"{"body": "Check-in opens soon"}"#).into_notification();
        assert_eq!(n.title, DEFAULT_TITLE);
        assert_eq!(n.body, "Check-in opens soon");
    }

    #[test]
    fn test_text_payload_becomes_body() {
        let n = PushPayload::parse(b"Your hotel confirmed").into_notification();
        assert_eq!(n.title, DEFAULT_TITLE);
        assert_eq!(n.body, "Your hotel confirmed");
    }

    #[test]
    fn test_same_tag_replaces() {
        let center = NotificationCenter::new();
        center.show(PushPayload::parse(br#"{"tag": "a", "body": "1"}"#).into_notification());
        center.show(PushPayload::parse(br#"{"tag": "a", "body": "2"}"#).into_notification());
        center.show(PushPayload::parse(br#"{"tag": "b"}"#).into_notification());

        let shown = center.list();
        assert_eq!(shown.len(), 2);
        let tagged: Vec<_> = shown.iter().filter(|n| n.tag == "a").collect();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].body, "2");
    }

    #[tokio::test]
    async fn test_click_focuses_existing_client() {
        let f = active_fixture().await;
        let existing = f
            .worker
            .clients()
            .register(Url::parse("https://wayfarer.app/trips/7").unwrap(), true);
        f.worker
            .handle_push(br#"{"tag": "trip", "data": {"url": "/trips/7"}}"#);

        let outcome = f.worker.handle_notification_click(&NotificationClick {
            tag: "trip".to_string(),
            action: None,
        });

        assert_eq!(outcome, ClickOutcome::Focused { client: existing });
        assert!(f.worker.clients().get(existing).unwrap().focused);
        assert!(f.worker.notifications().list().is_empty());
    }

    #[tokio::test]
    async fn test_click_opens_window_when_none_matches() {
        let f = active_fixture().await;
        f.worker
            .clients()
            .register(Url::parse("https://wayfarer.app/").unwrap(), true);
        f.worker.handle_push(br#"{"tag": "deal", "data": {"url": "/deals"}}"#);

        let outcome = f.worker.handle_notification_click(&NotificationClick {
            tag: "deal".to_string(),
            action: None,
        });

        let ClickOutcome::Opened { client } = outcome else {
            panic!("expected a new window, got {:?}", outcome);
        };
        let opened = f.worker.clients().get(client).unwrap();
        assert_eq!(opened.url.as_str(), "https://wayfarer.app/deals");
        assert!(opened.focused);
    }

    #[test]
    fn test_dismiss_action_only_closes() {
        let f = fixture();
        f.worker.handle_push(br#"{"tag": "x"}"#);

        let outcome = f.worker.handle_notification_click(&NotificationClick {
            tag: "x".to_string(),
            action: Some(DISMISS_ACTION.to_string()),
        });

        assert_eq!(outcome, ClickOutcome::Dismissed);
        assert!(f.worker.clients().list().is_empty());
        assert!(f.worker.notifications().list().is_empty());
    }
}
