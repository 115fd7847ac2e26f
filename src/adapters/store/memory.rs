//! In-memory document store
//!
//! Used by the `memory` store target for local runs and as the test double
//! for the import pipeline.

use super::traits::{CommitReceipt, DocumentStore};
use crate::domain::{DocValue, StoreError, WriteBatch, MAX_BATCH_WRITES};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

type Fields = BTreeMap<String, DocValue>;
type Collections = BTreeMap<String, BTreeMap<String, Fields>>;

/// Store holding documents in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<Collections>,
    commit_sizes: Mutex<Vec<usize>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn collections(&self) -> MutexGuard<'_, Collections> {
        self.collections.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn sizes(&self) -> MutexGuard<'_, Vec<usize>> {
        self.commit_sizes.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fetch a stored document
    pub fn get(&self, collection: &str, document_id: &str) -> Option<Fields> {
        self.collections()
            .get(collection)
            .and_then(|docs| docs.get(document_id))
            .cloned()
    }

    /// Number of documents in a collection
    pub fn collection_len(&self, collection: &str) -> usize {
        self.collections()
            .get(collection)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    /// Number of documents across all collections
    pub fn document_count(&self) -> usize {
        self.collections().values().map(BTreeMap::len).sum()
    }

    /// Sizes of every successful commit, in order
    pub fn commit_sizes(&self) -> Vec<usize> {
        self.sizes().clone()
    }

    /// Copy of the full store contents
    pub fn snapshot(&self) -> Collections {
        self.collections().clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn commit(&self, batch: &WriteBatch) -> Result<CommitReceipt, StoreError> {
        if batch.len() > MAX_BATCH_WRITES {
            return Err(StoreError::BatchTooLarge {
                size: batch.len(),
                limit: MAX_BATCH_WRITES,
            });
        }

        let mut collections = self.collections();
        let docs = collections
            .entry(batch.collection().as_str().to_string())
            .or_default();
        for write in batch.writes() {
            docs.insert(write.document_id.as_str().to_string(), write.fields.clone());
        }
        drop(collections);

        self.sizes().push(batch.len());

        Ok(CommitReceipt {
            writes: batch.len(),
            commit_time: Some(Utc::now()),
        })
    }
}
