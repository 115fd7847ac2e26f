//! Domain error types
//!
//! This module defines the error hierarchy for Docseed. Errors are split by
//! where they are recovered: [`ParseError`] and [`CommitError`] are scoped to a
//! single export file, while discovery and configuration errors abort the run.
//! None of them expose third-party types.

use crate::domain::ids::CollectionName;
use std::path::PathBuf;
use thiserror::Error;

/// Main Docseed error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum DocseedError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The source directory could not be enumerated
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// An export file could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A batch commit failed part way through a collection
    #[error("Commit error: {0}")]
    Commit(#[from] CommitError),

    /// Store-related errors outside of a collection import
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while reading an export file
///
/// A parse error fails only the file it came from.
#[derive(Debug, Error)]
pub enum ParseError {
    /// File could not be read from disk
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// File is not valid JSON
    #[error("Invalid JSON in {path}: {message}")]
    InvalidJson { path: PathBuf, message: String },

    /// Root object has no `__collection__` envelope
    #[error("Missing '{marker}' envelope in {path}")]
    MissingEnvelope { path: PathBuf, marker: &'static str },

    /// Envelope holds no collection
    #[error("No collection found in {path}")]
    NoCollection { path: PathBuf },

    /// Envelope holds more than one collection
    #[error("Expected exactly one collection in {path}, found {}: {}", .names.len(), .names.join(", "))]
    MultipleCollections { path: PathBuf, names: Vec<String> },

    /// Collection has no `__doc__` mapping
    #[error("Collection '{collection}' in {path} has no '{marker}' mapping")]
    MissingDocuments {
        path: PathBuf,
        collection: String,
        marker: &'static str,
    },

    /// Collection name is not usable as a Firestore collection id
    #[error("Invalid collection name in {path}: {reason}")]
    InvalidCollectionName { path: PathBuf, reason: String },

    /// Document id is not usable as a Firestore document id
    #[error("Invalid document id in {path}: {reason}")]
    InvalidDocumentId { path: PathBuf, reason: String },

    /// Document body is not an object
    #[error("Document '{document_id}' in {path} is not an object")]
    InvalidDocumentBody { path: PathBuf, document_id: String },
}

/// A batch commit failed while importing a collection
///
/// `committed` counts the documents in batches that were committed before
/// the failing one. Those batches stay in the store.
#[derive(Debug, Error)]
#[error("Collection '{collection}' failed after {committed} committed document(s): {source}")]
pub struct CommitError {
    /// Collection being imported
    pub collection: CollectionName,

    /// Documents committed before the failing batch
    pub committed: usize,

    /// Store failure for the failing batch
    #[source]
    pub source: StoreError,
}

/// Errors returned by a document store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to reach the store
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Credentials rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Store rejected the request (4xx)
    #[error("Request rejected: {status} - {message}")]
    Rejected { status: u16, message: String },

    /// Store failed to process the request (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Response could not be interpreted
    #[error("Invalid response from store: {0}")]
    InvalidResponse(String),

    /// Batch exceeds the store's write ceiling
    #[error("Batch of {size} writes exceeds the store limit of {limit}")]
    BatchTooLarge { size: usize, limit: usize },
}

impl ParseError {
    /// Path of the export file the error refers to
    pub fn path(&self) -> &PathBuf {
        match self {
            ParseError::Read { path, .. }
            | ParseError::InvalidJson { path, .. }
            | ParseError::MissingEnvelope { path, .. }
            | ParseError::NoCollection { path }
            | ParseError::MultipleCollections { path, .. }
            | ParseError::MissingDocuments { path, .. }
            | ParseError::InvalidCollectionName { path, .. }
            | ParseError::InvalidDocumentId { path, .. }
            | ParseError::InvalidDocumentBody { path, .. } => path,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for DocseedError {
    fn from(err: std::io::Error) -> Self {
        DocseedError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for DocseedError {
    fn from(err: serde_json::Error) -> Self {
        DocseedError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for DocseedError {
    fn from(err: toml::de::Error) -> Self {
        DocseedError::Configuration(format!("TOML parse error: {err}"))
    }
}
