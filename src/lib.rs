//! Order Service - Order placement and checkout orchestration
//!
//! Turns a user's cart into a durable order record, drives payment, and
//! reconciles state across the cart, payment, and notification
//! collaborators with forward-only compensation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
