//! Foundation module - Shared domain primitives.
//!
//! Contains the value objects, identifiers, and error types that form the
//! vocabulary of the order domain.

mod errors;
mod events;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use events::{EventEnvelope, EventId};
pub use ids::{OrderId, ProductId, UserId};
pub use state_machine::{StateMachine, TransitionError};
pub use timestamp::Timestamp;
