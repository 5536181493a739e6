//! HTTP adapters - this service's own axum boundary.

pub mod order;
