// Implementations for the moderation system.

pub mod in_memory;

pub use in_memory::InMemoryViolationStore;
