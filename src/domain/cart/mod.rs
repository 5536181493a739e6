//! Cart context - the snapshot the cart collaborator hands us.
//!
//! The cart service owns the authoritative cart; this service only ever
//! reads a point-in-time snapshot of it and asks for it to be cleared.

mod cart;

pub use cart::{Cart, CartItem};
