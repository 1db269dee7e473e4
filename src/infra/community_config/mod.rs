// Implementations for community configuration storage.

pub mod in_memory;

pub use in_memory::InMemoryConfigStore;
