//! Write batch model
//!
//! A [`WriteBatch`] is an ordered group of full-document upserts for one
//! collection, bounded by a fixed limit and committed by the store as a single
//! atomic unit.

use crate::domain::ids::{CollectionName, DocumentId};
use crate::domain::value::DocValue;
use std::collections::BTreeMap;

/// Firestore's ceiling on writes per commit
pub const MAX_BATCH_WRITES: usize = 500;

/// A single staged upsert
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentWrite {
    /// Target document id
    pub document_id: DocumentId,

    /// Full replacement body
    pub fields: BTreeMap<String, DocValue>,
}

/// Bounded group of upserts for one collection
#[derive(Debug, Clone)]
pub struct WriteBatch {
    collection: CollectionName,
    limit: usize,
    writes: Vec<DocumentWrite>,
}

impl WriteBatch {
    /// Create an empty batch for a collection
    ///
    /// A limit of zero or above [`MAX_BATCH_WRITES`] is clamped into range.
    pub fn new(collection: CollectionName, limit: usize) -> Self {
        let limit = limit.clamp(1, MAX_BATCH_WRITES);
        Self {
            collection,
            limit,
            writes: Vec::with_capacity(limit),
        }
    }

    /// Stage an upsert
    ///
    /// Returns `false` without staging when the batch is already full.
    pub fn set(&mut self, document_id: DocumentId, fields: BTreeMap<String, DocValue>) -> bool {
        if self.is_full() {
            return false;
        }
        self.writes.push(DocumentWrite {
            document_id,
            fields,
        });
        true
    }

    /// Collection all writes target
    pub fn collection(&self) -> &CollectionName {
        &self.collection
    }

    /// Staged writes in order
    pub fn writes(&self) -> &[DocumentWrite] {
        &self.writes
    }

    /// Maximum number of writes
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of staged writes
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Whether nothing is staged
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Whether the limit has been reached
    pub fn is_full(&self) -> bool {
        self.writes.len() >= self.limit
    }

    /// Take the staged writes, leaving the batch empty for reuse
    pub fn take(&mut self) -> WriteBatch {
        WriteBatch {
            collection: self.collection.clone(),
            limit: self.limit,
            writes: std::mem::replace(&mut self.writes, Vec::with_capacity(self.limit)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> CollectionName {
        CollectionName::new("subjects").unwrap()
    }

    fn doc(id: &str) -> DocumentId {
        DocumentId::new(id).unwrap()
    }

    #[test]
    fn test_new_batch_is_empty() {
        let batch = WriteBatch::new(collection(), 10);
        assert!(batch.is_empty());
        assert!(!batch.is_full());
        assert_eq!(batch.limit(), 10);
        assert_eq!(batch.collection().as_str(), "subjects");
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(WriteBatch::new(collection(), 0).limit(), 1);
        assert_eq!(WriteBatch::new(collection(), 10_000).limit(), MAX_BATCH_WRITES);
    }

    #[test]
    fn test_set_until_full() {
        let mut batch = WriteBatch::new(collection(), 2);
        assert!(batch.set(doc("a"), BTreeMap::new()));
        assert!(batch.set(doc("b"), BTreeMap::new()));
        assert!(batch.is_full());
        assert!(!batch.set(doc("c"), BTreeMap::new()));
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_take_resets() {
        let mut batch = WriteBatch::new(collection(), 2);
        batch.set(doc("a"), BTreeMap::new());

        let taken = batch.take();
        assert_eq!(taken.len(), 1);
        assert_eq!(taken.writes()[0].document_id.as_str(), "a");
        assert!(batch.is_empty());
        assert_eq!(batch.limit(), 2);
    }
}
