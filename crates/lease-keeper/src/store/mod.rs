//! Persistence backends satisfying the repository contracts.

pub mod memory;

pub use memory::InMemoryStore;
