//! Domain identifier types with validation
//!
//! Newtype wrappers for Firestore path segments. Collection ids and document
//! ids share the same rules:
//! - non-empty and at most 1500 bytes
//! - no forward slash
//! - not `.` or `..`
//! - not of the reserved form `__...__`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum size of a path segment in bytes
const MAX_SEGMENT_BYTES: usize = 1500;

fn validate_segment(kind: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{kind} cannot be empty"));
    }
    if value.len() > MAX_SEGMENT_BYTES {
        return Err(format!(
            "{kind} exceeds {MAX_SEGMENT_BYTES} bytes ({} bytes)",
            value.len()
        ));
    }
    if value.contains('/') {
        return Err(format!("{kind} '{value}' cannot contain '/'"));
    }
    if value == "." || value == ".." {
        return Err(format!("{kind} cannot be '{value}'"));
    }
    if value.len() >= 4 && value.starts_with("__") && value.ends_with("__") {
        return Err(format!("{kind} '{value}' uses the reserved __name__ form"));
    }
    Ok(())
}

/// Collection name newtype wrapper
///
/// # Examples
///
/// ```
/// use docseed::domain::ids::CollectionName;
/// use std::str::FromStr;
///
/// let name = CollectionName::from_str("questionBanks").unwrap();
/// assert_eq!(name.as_str(), "questionBanks");
/// assert!(CollectionName::from_str("users/abc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectionName(String);

impl CollectionName {
    /// Creates a new CollectionName from a string
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        validate_segment("Collection name", &name)?;
        Ok(Self(name))
    }

    /// Returns the collection name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CollectionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Document id newtype wrapper
///
/// # Examples
///
/// ```
/// use docseed::domain::ids::DocumentId;
/// use std::str::FromStr;
///
/// let id = DocumentId::from_str("q-0001").unwrap();
/// assert_eq!(id.to_string(), "q-0001");
/// assert!(DocumentId::from_str("__meta__").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a new DocumentId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        validate_segment("Document id", &id)?;
        Ok(Self(id))
    }

    /// Returns the document id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_name_valid() {
        let name = CollectionName::new("learningProgress").unwrap();
        assert_eq!(name.as_str(), "learningProgress");
        assert_eq!(name.to_string(), "learningProgress");
        assert_eq!(name.into_inner(), "learningProgress");
    }

    #[test]
    fn test_collection_name_rejects_empty() {
        assert!(CollectionName::new("").is_err());
    }

    #[test]
    fn test_collection_name_rejects_slash() {
        let err = CollectionName::new("users/abc").unwrap_err();
        assert!(err.contains("'/'"));
    }

    #[test]
    fn test_document_id_rejects_dots() {
        assert!(DocumentId::new(".").is_err());
        assert!(DocumentId::new("..").is_err());
        assert!(DocumentId::new("a.b").is_ok());
    }

    #[test]
    fn test_document_id_rejects_reserved() {
        assert!(DocumentId::new("__doc__").is_err());
        assert!(DocumentId::new("__").is_ok());
        assert!(DocumentId::new("__partial").is_ok());
    }

    #[test]
    fn test_document_id_rejects_oversized() {
        let long = "x".repeat(MAX_SEGMENT_BYTES + 1);
        assert!(DocumentId::new(long).is_err());
        let max = "x".repeat(MAX_SEGMENT_BYTES);
        assert!(DocumentId::new(max).is_ok());
    }

    #[test]
    fn test_document_id_from_str() {
        let id = DocumentId::from_str("user-42").unwrap();
        assert_eq!(id.as_ref(), "user-42");
    }
}
