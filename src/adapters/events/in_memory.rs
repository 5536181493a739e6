//! In-memory event bus for tests.
//!
//! Captures published envelopes synchronously so tests can assert on them.
//! Not for production use; lock poisoning panics are acceptable here.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::foundation::EventEnvelope;
use crate::ports::{EventPublisher, PublishError};

/// In-memory event bus that records everything published to it.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// publisher.publish(envelope).await?;
/// assert!(bus.has_event("order.created"));
/// ```
pub struct InMemoryEventBus {
    published: RwLock<Vec<EventEnvelope>>,
    fail_publish: bool,
}

impl InMemoryEventBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self {
            published: RwLock::new(Vec::new()),
            fail_publish: false,
        }
    }

    /// Creates a bus whose publishes always fail, for swallow-and-log tests.
    pub fn failing() -> Self {
        Self {
            published: RwLock::new(Vec::new()),
            fail_publish: true,
        }
    }

    /// Returns all published events (for test assertions).
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .clone()
    }

    /// Returns events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Returns count of published events.
    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .len()
    }

    /// Checks if an event of the given type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        !self.events_of_type(event_type).is_empty()
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), PublishError> {
        if self.fail_publish {
            return Err(PublishError("simulated publish failure".into()));
        }
        self.published
            .write()
            .expect("InMemoryEventBus: published write lock poisoned")
            .push(event);
        Ok(())
    }
}
