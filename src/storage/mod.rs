//! Store implementations

pub mod fixtures;
pub mod in_memory;
pub mod mock;

pub use in_memory::InMemoryStore;
pub use mock::MockStore;
