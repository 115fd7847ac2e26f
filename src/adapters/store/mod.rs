//! Document store abstraction layer
//!
//! This module provides a trait-based abstraction over the import target,
//! allowing Docseed to write to Firestore or to an in-memory store.

pub mod factory;
pub mod memory;
pub mod traits;

pub use factory::create_store;
pub use memory::MemoryStore;
pub use traits::{CommitReceipt, DocumentStore};
