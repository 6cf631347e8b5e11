//! Window clients.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;
use url::Url;

/// An open window the worker may control.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WindowClient {
    pub id: u64,
    pub url: Url,
    pub focused: bool,
    pub controlled: bool,
}

/// Known window clients, keyed by id.
#[derive(Clone, Default)]
pub struct ClientRegistry {
    clients: Arc<DashMap<u64, WindowClient>>,
    next_id: Arc<AtomicU64>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a window that has opened.
    pub fn register(&self, url: Url, controlled: bool) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.clients.insert(
            id,
            WindowClient {
                id,
                url,
                focused: false,
                controlled,
            },
        );
        id
    }

    /// Take control of every known client. Returns how many there are.
    pub fn claim(&self) -> usize {
        for mut client in self.clients.iter_mut() {
            client.controlled = true;
        }
        self.clients.len()
    }

    pub fn find_by_url(&self, url: &Url) -> Option<u64> {
        self.clients
            .iter()
            .filter(|c| c.url == *url)
            .map(|c| c.id)
            .min()
    }

    /// Focus one client. Returns `false` if it is unknown.
    pub fn focus(&self, id: u64) -> bool {
        if !self.clients.contains_key(&id) {
            return false;
        }
        for mut client in self.clients.iter_mut() {
            client.focused = client.id == id;
        }
        debug!("Focused client {}", id);
        true
    }

    /// Open and focus a new controlled window.
    pub fn open_window(&self, url: Url) -> u64 {
        let id = self.register(url, true);
        self.focus(id);
        id
    }

    pub fn get(&self, id: u64) -> Option<WindowClient> {
        self.clients.get(&id).map(|c| c.clone())
    }

    pub fn list(&self) -> Vec<WindowClient> {
        let mut clients: Vec<WindowClient> = self.clients.iter().map(|c| c.clone()).collect();
        clients.sort_by_key(|c| c.id);
        clients
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse("https://wayfarer.app").unwrap().join(path).unwrap()
    }

    #[test]
    fn test_claim_controls_everyone() {
        let clients = ClientRegistry::new();
        clients.register(url("/"), false);
        clients.register(url("/trips"), false);

        assert_eq!(clients.claim(), 2);
        assert!(clients.list().iter().all(|c| c.controlled));
    }

    #[test]
    fn test_focus_is_exclusive() {
        let clients = ClientRegistry::new();
        let a = clients.register(url("/"), true);
        let b = clients.register(url("/trips"), true);

        assert!(clients.focus(a));
        assert!(clients.focus(b));
        assert!(!clients.get(a).unwrap().focused);
        assert!(clients.get(b).unwrap().focused);
        assert!(!clients.focus(99));
    }

    #[test]
    fn test_open_window_registers_focused_client() {
        let clients = ClientRegistry::new();
        let id = clients.open_window(url("/bookings"));

        assert_eq!(clients.find_by_url(&url("/bookings")), Some(id));
        let client = clients.get(id).unwrap();
        assert!(client.focused && client.controlled);
    }
}
