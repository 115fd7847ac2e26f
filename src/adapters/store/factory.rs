//! Document store factory
//!
//! This module creates the store selected by `store_target`.

use super::memory::MemoryStore;
use super::traits::DocumentStore;
use crate::adapters::firestore::FirestoreClient;
use crate::config::schema::{DocseedConfig, StoreTarget};
use crate::domain::{DocseedError, Result};
use std::sync::Arc;

/// Create a document store based on the configuration
///
/// # Errors
///
/// Returns an error if the Firestore section is missing or the client cannot
/// be created.
pub fn create_store(config: &DocseedConfig) -> Result<Arc<dyn DocumentStore>> {
    match config.store_target {
        StoreTarget::Firestore => {
            let firestore_config = config.firestore.as_ref().ok_or_else(|| {
                DocseedError::Configuration(
                    "store_target is 'firestore' but [firestore] section is missing".to_string(),
                )
            })?;

            tracing::info!(
                project_id = %firestore_config.project_id,
                database_id = %firestore_config.database_id,
                "Creating Firestore client"
            );
            let client = FirestoreClient::new(firestore_config)?;

            Ok(Arc::new(client) as Arc<dyn DocumentStore>)
        }
        StoreTarget::Memory => {
            tracing::info!("Creating in-memory store");
            Ok(Arc::new(MemoryStore::new()) as Arc<dyn DocumentStore>)
        }
    }
}
