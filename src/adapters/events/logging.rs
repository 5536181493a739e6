//! Tracing-backed event publisher.
//!
//! Emits each event to the structured log stream. This stands in for a real
//! broker integration; consumers tail the log pipeline. Publishing never
//! fails, which matches the at-most-once, no-acknowledgment contract.

use async_trait::async_trait;

use crate::domain::foundation::EventEnvelope;
use crate::ports::{EventPublisher, PublishError};

/// Publishes events as structured log records.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEventPublisher;

impl LoggingEventPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for LoggingEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), PublishError> {
        tracing::info!(
            event_id = %event.event_id,
            event_type = %event.event_type,
            aggregate_id = %event.aggregate_id,
            aggregate_type = %event.aggregate_type,
            payload = %event.payload,
            "event published"
        );
        Ok(())
    }
}
