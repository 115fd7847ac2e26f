//! External system integrations for Docseed.
//!
//! - [`store`] - Document store abstraction, factory and in-memory store
//! - [`firestore`] - Cloud Firestore REST implementation
//!
//! Adapters isolate external dependencies behind the
//! [`store::DocumentStore`] trait so the import pipeline can be tested
//! against the in-memory store.

pub mod firestore;
pub mod store;
