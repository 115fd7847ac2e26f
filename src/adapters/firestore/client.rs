//! Firestore REST client
//!
//! Commits write batches through the `documents:commit` endpoint of the
//! Firestore v1 REST API. Each commit is atomic on the server side.

use super::auth::{ServiceAccountAuth, ServiceAccountKey};
use super::models::{CommitRequest, CommitResponse, ErrorResponse, Write};
use crate::adapters::store::{CommitReceipt, DocumentStore};
use crate::config::{FirestoreConfig, SecretString};
use crate::domain::{Result, StoreError, WriteBatch, MAX_BATCH_WRITES};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Firestore client
///
/// # Example
///
/// ```no_run
/// use docseed::adapters::firestore::FirestoreClient;
/// use docseed::config::FirestoreConfig;
///
/// # fn example() -> docseed::domain::Result<()> {
/// let config: FirestoreConfig = toml::from_str(r#"project_id = "learning-app""#).unwrap();
/// let client = FirestoreClient::new(&config)?;
/// assert!(client.commit_url().ends_with("documents:commit"));
/// # Ok(())
/// # }
/// ```
pub struct FirestoreClient {
    /// HTTP client for making requests
    client: Client,

    /// `projects/{project}/databases/{database}/documents`
    documents_root: String,

    /// Full URL of the commit endpoint
    commit_url: String,

    /// Where bearer tokens come from
    credentials: Credentials,
}

/// Source of the bearer token sent with each commit
enum Credentials {
    /// No token, for the emulator
    Anonymous,
    /// Pre-minted token used as is
    Static(SecretString),
    /// Tokens minted and refreshed from a service-account key
    ServiceAccount(ServiceAccountAuth),
}

impl FirestoreClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`DocseedError::Store`](crate::domain::DocseedError::Store) if
    /// the HTTP client cannot be built, or a configuration error if the
    /// service-account key is unusable.
    pub fn new(config: &FirestoreConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                StoreError::ConnectionFailed(format!("Failed to build HTTP client: {e}"))
            })?;

        let documents_root = format!(
            "projects/{}/databases/{}/documents",
            config.project_id, config.database_id
        );
        let commit_url = format!(
            "{}/{}:commit",
            config.base_url.trim_end_matches('/'),
            documents_root
        );

        let credentials = match (&config.access_token, &config.credentials_path) {
            (Some(token), _) => Credentials::Static(token.clone()),
            (None, Some(path)) => {
                let key = ServiceAccountKey::load(path)?;
                if let Some(ref key_project) = key.project_id {
                    if *key_project != config.project_id {
                        tracing::warn!(
                            key_project = %key_project,
                            project_id = %config.project_id,
                            "Service-account key belongs to a different project"
                        );
                    }
                }
                let auth = ServiceAccountAuth::new(&key, client.clone())?;
                tracing::info!(
                    client_email = %auth.client_email(),
                    "Authenticating with service-account key"
                );
                Credentials::ServiceAccount(auth)
            }
            (None, None) => {
                tracing::warn!(
                    base_url = %config.base_url,
                    "No Firestore credentials configured, sending unauthenticated requests"
                );
                Credentials::Anonymous
            }
        };

        Ok(Self {
            client,
            documents_root,
            commit_url,
            credentials,
        })
    }

    /// Commit endpoint URL
    pub fn commit_url(&self) -> &str {
        &self.commit_url
    }

    fn build_request(&self, batch: &WriteBatch) -> CommitRequest {
        let collection_path = format!("{}/{}", self.documents_root, batch.collection());
        CommitRequest {
            writes: batch
                .writes()
                .iter()
                .map(|write| Write::upsert(&collection_path, write))
                .collect(),
        }
    }
}

/// Map a transport error to a store error
pub(super) fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Timeout(err.to_string())
    } else {
        StoreError::ConnectionFailed(err.to_string())
    }
}

/// Map a non-success response to a store error
fn status_error(status: StatusCode, body: &str) -> StoreError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Authentication(message),
        s if s.is_server_error() => StoreError::ServerError {
            status: s.as_u16(),
            message,
        },
        s => StoreError::Rejected {
            status: s.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    fn name(&self) -> &str {
        "firestore"
    }

    async fn commit(&self, batch: &WriteBatch) -> std::result::Result<CommitReceipt, StoreError> {
        if batch.len() > MAX_BATCH_WRITES {
            return Err(StoreError::BatchTooLarge {
                size: batch.len(),
                limit: MAX_BATCH_WRITES,
            });
        }
        if batch.is_empty() {
            return Ok(CommitReceipt {
                writes: 0,
                commit_time: None,
            });
        }

        let token = match self.credentials {
            Credentials::Anonymous => None,
            Credentials::Static(ref token) => Some(token.clone()),
            Credentials::ServiceAccount(ref auth) => Some(auth.access_token().await?),
        };

        let body = self.build_request(batch);
        let mut request = self.client.post(&self.commit_url).json(&body);
        if let Some(ref token) = token {
            request = request.bearer_auth(token.expose_secret().as_ref());
        }

        tracing::debug!(
            collection = %batch.collection(),
            writes = batch.len(),
            "Sending Firestore commit"
        );

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                if let Credentials::ServiceAccount(ref auth) = self.credentials {
                    auth.invalidate().await;
                }
            }
            return Err(status_error(status, &text));
        }

        let parsed: CommitResponse = serde_json::from_str(&text)
            .map_err(|e| StoreError::InvalidResponse(format!("Unreadable commit response: {e}")))?;

        if parsed.write_results.len() != batch.len() {
            tracing::warn!(
                collection = %batch.collection(),
                expected = batch.len(),
                reported = parsed.write_results.len(),
                "Firestore reported an unexpected number of write results"
            );
        }

        let commit_time = parsed
            .commit_time
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc));

        Ok(CommitReceipt {
            writes: batch.len(),
            commit_time,
        })
    }
}
