// Implementations for the points ledger.

pub mod in_memory;

pub use in_memory::InMemoryPointsStore;
