//! Collection export loader
//!
//! An export file holds exactly one collection:
//!
//! ```json
//! { "__collection__": { "<name>": { "__doc__": { "<id>": { ...fields } } } } }
//! ```

use crate::domain::{CollectionName, DocumentId, ParseError};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Key wrapping the collection mapping
pub const COLLECTION_MARKER: &str = "__collection__";

/// Key wrapping the document mapping
pub const DOCUMENT_MARKER: &str = "__doc__";

/// Raw contents of one export file
#[derive(Debug, Clone)]
pub struct CollectionExport {
    /// File the export was read from
    pub path: PathBuf,

    /// Target collection
    pub collection: CollectionName,

    /// Document ids and raw bodies, in file order
    pub documents: Vec<(DocumentId, Map<String, Value>)>,
}

impl CollectionExport {
    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the collection has no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Read and parse an export file
///
/// # Errors
///
/// Returns a [`ParseError`] if the file cannot be read, is not JSON, or does
/// not follow the single-collection envelope.
pub async fn load_export(path: &Path) -> Result<CollectionExport, ParseError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ParseError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    parse_export(path, &contents)
}

/// Parse export text read from `path`
pub fn parse_export(path: &Path, contents: &str) -> Result<CollectionExport, ParseError> {
    let root: Value = serde_json::from_str(contents).map_err(|e| ParseError::InvalidJson {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let missing_envelope = || ParseError::MissingEnvelope {
        path: path.to_path_buf(),
        marker: COLLECTION_MARKER,
    };

    let Value::Object(mut root) = root else {
        return Err(missing_envelope());
    };
    let Some(Value::Object(envelope)) = root.remove(COLLECTION_MARKER) else {
        return Err(missing_envelope());
    };

    if envelope.len() > 1 {
        return Err(ParseError::MultipleCollections {
            path: path.to_path_buf(),
            names: envelope.keys().cloned().collect(),
        });
    }
    let Some((name, body)) = envelope.into_iter().next() else {
        return Err(ParseError::NoCollection {
            path: path.to_path_buf(),
        });
    };

    let collection =
        CollectionName::new(name.as_str()).map_err(|reason| ParseError::InvalidCollectionName {
            path: path.to_path_buf(),
            reason,
        })?;

    let docs = match body {
        Value::Object(mut body) => match body.remove(DOCUMENT_MARKER) {
            Some(Value::Object(docs)) => Some(docs),
            _ => None,
        },
        _ => None,
    };
    let Some(docs) = docs else {
        return Err(ParseError::MissingDocuments {
            path: path.to_path_buf(),
            collection: name,
            marker: DOCUMENT_MARKER,
        });
    };

    let mut documents = Vec::with_capacity(docs.len());
    for (id, body) in docs {
        let Value::Object(fields) = body else {
            return Err(ParseError::InvalidDocumentBody {
                path: path.to_path_buf(),
                document_id: id,
            });
        };
        let document_id =
            DocumentId::new(id).map_err(|reason| ParseError::InvalidDocumentId {
                path: path.to_path_buf(),
                reason,
            })?;
        documents.push((document_id, fields));
    }

    tracing::debug!(
        path = %path.display(),
        collection = %collection,
        documents = documents.len(),
        "Loaded export file"
    );

    Ok(CollectionExport {
        path: path.to_path_buf(),
        collection,
        documents,
    })
}
