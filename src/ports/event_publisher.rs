//! EventPublisher port - fire-and-forget notification sink.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::EventEnvelope;

/// Port for publishing domain events.
///
/// Delivery is at-most-once and requires no acknowledgment. Callers in the
/// placement flow swallow and log publish failures; the caller-visible
/// outcome of an operation never depends on this port.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes a single event envelope.
    async fn publish(&self, event: EventEnvelope) -> Result<(), PublishError>;
}

/// Error from the event transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("event publish failed: {0}")]
pub struct PublishError(pub String);
