// src/client/mod.rs
//! Browser client event source
//!
//! Recording strategies attach to a [`BrowserClient`] as
//! [`WindowListener`]s. [`EventHub`] is the in-process implementation:
//! whatever drives the browser calls its `fire_*` methods and every
//! subscribed listener is invoked in subscription order.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Window lifecycle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEvent {
    /// Name of the window the event concerns
    pub window_name: String,
    /// Page shown before the change, if any
    pub old_page: Option<String>,
    /// Page shown after the change, if any
    pub new_page: Option<String>,
}

impl WindowEvent {
    pub fn new(window_name: impl Into<String>) -> Self {
        Self {
            window_name: window_name.into(),
            old_page: None,
            new_page: None,
        }
    }

    pub fn with_pages(mut self, old_page: Option<String>, new_page: Option<String>) -> Self {
        self.old_page = old_page;
        self.new_page = new_page;
        self
    }
}

/// Receiver of window lifecycle events
pub trait WindowListener: Send + Sync {
    fn window_opened(&self, event: &WindowEvent);

    fn window_content_changed(&self, event: &WindowEvent);

    fn window_closed(&self, event: &WindowEvent);
}

/// Handle returned by [`BrowserClient::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Something that emits window lifecycle events
pub trait BrowserClient: Send + Sync {
    fn subscribe(&self, listener: Arc<dyn WindowListener>) -> SubscriptionId;

    /// Returns `false` if the subscription was unknown
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// In-process event source
#[derive(Default)]
pub struct EventHub {
    listeners: RwLock<Vec<(SubscriptionId, Arc<dyn WindowListener>)>>,
    next_id: AtomicU64,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn fire_window_opened(&self, event: &WindowEvent) {
        debug!("Window opened: {}", event.window_name);
        for listener in self.snapshot() {
            listener.window_opened(event);
        }
    }

    pub fn fire_window_content_changed(&self, event: &WindowEvent) {
        debug!("Window content changed: {}", event.window_name);
        for listener in self.snapshot() {
            listener.window_content_changed(event);
        }
    }

    pub fn fire_window_closed(&self, event: &WindowEvent) {
        debug!("Window closed: {}", event.window_name);
        for listener in self.snapshot() {
            listener.window_closed(event);
        }
    }

    // Listeners run without the lock held so they may subscribe or unsubscribe
    fn snapshot(&self) -> Vec<Arc<dyn WindowListener>> {
        self.listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }
}

impl BrowserClient for EventHub {
    fn subscribe(&self, listener: Arc<dyn WindowListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Collector {
        seen: Mutex<Vec<String>>,
    }

    impl WindowListener for Collector {
        fn window_opened(&self, event: &WindowEvent) {
            self.seen.lock().push(format!("opened:{}", event.window_name));
        }

        fn window_content_changed(&self, event: &WindowEvent) {
            self.seen.lock().push(format!("changed:{}", event.window_name));
        }

        fn window_closed(&self, event: &WindowEvent) {
            self.seen.lock().push(format!("closed:{}", event.window_name));
        }
    }

    #[test]
    fn test_events_reach_subscribers() {
        let hub = EventHub::new();
        let collector = Arc::new(Collector::default());
        hub.subscribe(collector.clone());

        let event = WindowEvent::new("main");
        hub.fire_window_opened(&event);
        hub.fire_window_content_changed(&event);
        hub.fire_window_closed(&event);

        assert_eq!(
            *collector.seen.lock(),
            ["opened:main", "changed:main", "closed:main"]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let hub = EventHub::new();
        let collector = Arc::new(Collector::default());
        let id = hub.subscribe(collector.clone());

        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));
        assert_eq!(hub.listener_count(), 0);

        hub.fire_window_opened(&WindowEvent::new("main"));
        assert!(collector.seen.lock().is_empty());
    }
}
