//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `cart` - cart service client (HTTP) and in-memory store
//! - `payment` - payment service client (HTTP) and configurable mock
//! - `events` - event publishers (tracing-backed, in-memory)
//! - `postgres` - PostgreSQL order repository
//! - `repository` - in-memory order repository
//! - `http` - this service's own axum boundary

pub mod cart;
pub mod events;
pub mod http;
pub mod payment;
pub mod postgres;
pub mod repository;
