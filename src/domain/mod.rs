//! Domain models and types for Docseed.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`CollectionName`], [`DocumentId`])
//! - **The document value model** ([`DocValue`])
//! - **Write batches** ([`WriteBatch`]) bounded by the store's per-commit ceiling
//! - **Error types** ([`DocseedError`], [`ParseError`], [`CommitError`], [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers are validated on construction, so an invalid path segment is
//! rejected while loading an export file rather than by the store mid-import:
//!
//! ```rust
//! use docseed::domain::{CollectionName, DocumentId};
//!
//! let collection = CollectionName::new("questions").unwrap();
//! let id = DocumentId::new("q-17").unwrap();
//! assert!(DocumentId::new("a/b").is_err());
//! ```

pub mod batch;
pub mod errors;
pub mod ids;
pub mod result;
pub mod value;

// Re-export commonly used types for convenience
pub use batch::{DocumentWrite, WriteBatch, MAX_BATCH_WRITES};
pub use errors::{CommitError, DocseedError, ParseError, StoreError};
pub use ids::{CollectionName, DocumentId};
pub use result::Result;
pub use value::DocValue;
