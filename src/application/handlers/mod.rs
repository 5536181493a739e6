//! Command and query handlers, one module per context.

pub mod order;
