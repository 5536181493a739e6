//! Order repository adapters that need no external storage.

mod in_memory;

pub use in_memory::InMemoryOrderRepository;
