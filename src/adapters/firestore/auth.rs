//! Service-account authentication
//!
//! Mints OAuth 2.0 access tokens from a service-account key using the JWT
//! bearer grant, and caches each token until shortly before it expires. A long
//! import therefore keeps working past the one-hour token lifetime.

use super::client::transport_error;
use crate::config::{secret_string, SecretString};
use crate::domain::{DocseedError, Result, StoreError};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;

/// OAuth scope granting read/write access to Firestore
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of a signed assertion; the token endpoint rejects more than an hour
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Cached tokens this close to expiry are replaced before use
const REFRESH_MARGIN_SECS: i64 = 60;

/// Service-account JSON key as downloaded from the Google Cloud console
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account identity, used as the assertion issuer
    pub client_email: String,

    /// PEM-encoded RSA private key
    pub private_key: SecretString,

    /// Key id, sent as the JWT `kid` header
    #[serde(default)]
    pub private_key_id: Option<String>,

    /// OAuth token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,

    /// Project the key belongs to
    #[serde(default)]
    pub project_id: Option<String>,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccountKey {
    /// Parse a key from its JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            DocseedError::Configuration(format!("Invalid service-account key: {e}"))
        })
    }

    /// Read and parse a key file
    ///
    /// # Errors
    ///
    /// Returns [`DocseedError::Configuration`] if the file cannot be read or
    /// is not a service-account key.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DocseedError::Configuration(format!(
                "Failed to read service-account key {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&contents)
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

struct CachedToken {
    token: SecretString,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Access token provider backed by a service-account key
pub struct ServiceAccountAuth {
    client_email: String,
    key_id: Option<String>,
    token_uri: String,
    encoding_key: EncodingKey,
    http: Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    /// Create a provider from a key, sharing the given HTTP client
    ///
    /// # Errors
    ///
    /// Returns [`DocseedError::Configuration`] if the private key is not a
    /// valid RSA PEM key.
    pub fn new(key: &ServiceAccountKey, http: Client) -> Result<Self> {
        let encoding_key =
            EncodingKey::from_rsa_pem(key.private_key.expose_secret().as_ref().as_bytes())
                .map_err(|e| {
                    DocseedError::Configuration(format!(
                        "Invalid private key for {}: {e}",
                        key.client_email
                    ))
                })?;

        Ok(Self {
            client_email: key.client_email.clone(),
            key_id: key.private_key_id.clone(),
            token_uri: key.token_uri.clone(),
            encoding_key,
            http,
            cached: Mutex::new(None),
        })
    }

    /// Service account identity
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Current access token, minting a new one when the cached token is
    /// missing or about to expire
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Authentication`] if the token endpoint refuses
    /// the assertion, or a transport error if it cannot be reached.
    pub async fn access_token(&self) -> std::result::Result<SecretString, StoreError> {
        let mut cached = self.cached.lock().await;

        if let Some(ref token) = *cached {
            if token.is_fresh(Utc::now()) {
                return Ok(token.token.clone());
            }
            tracing::debug!(client_email = %self.client_email, "Refreshing access token");
        }

        let fresh = self.exchange().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    /// Drop the cached token so the next request mints a new one
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    fn assertion(&self, now: DateTime<Utc>) -> std::result::Result<String, StoreError> {
        let claims = Claims {
            iss: &self.client_email,
            scope: DATASTORE_SCOPE,
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| StoreError::Authentication(format!("Failed to sign assertion: {e}")))
    }

    async fn exchange(&self) -> std::result::Result<CachedToken, StoreError> {
        let now = Utc::now();
        let assertion = self.assertion(now)?;

        let response = self
            .http
            .post(&self.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = serde_json::from_str::<TokenErrorResponse>(&text)
                .map(|e| match e.error_description {
                    Some(description) => format!("{}: {description}", e.error),
                    None => e.error,
                })
                .unwrap_or(text);
            return Err(StoreError::Authentication(format!(
                "Token exchange failed ({}): {message}",
                status.as_u16()
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| StoreError::InvalidResponse(format!("Unreadable token response: {e}")))?;

        tracing::info!(
            client_email = %self.client_email,
            expires_in = parsed.expires_in,
            "Minted Firestore access token"
        );

        Ok(CachedToken {
            token: secret_string(parsed.access_token),
            expires_at: now + Duration::seconds(parsed.expires_in),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const TEST_KEY_PEM: &str = include_str!("../../../tests/fixtures/test_service_account.pem");

    fn key(token_uri: &str) -> ServiceAccountKey {
        ServiceAccountKey::from_json(
            &serde_json::json!({
                "type": "service_account",
                "project_id": "learning-app",
                "private_key_id": "key-1",
                "private_key": TEST_KEY_PEM,
                "client_email": "importer@learning-app.iam.gserviceaccount.com",
                "token_uri": token_uri
            })
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_key_defaults() {
        let key = ServiceAccountKey::from_json(
            &serde_json::json!({
                "private_key": TEST_KEY_PEM,
                "client_email": "importer@learning-app.iam.gserviceaccount.com"
            })
            .to_string(),
        )
        .unwrap();
        assert_eq!(key.token_uri, "https://oauth2.googleapis.com/token");
        assert!(key.private_key_id.is_none());
        assert!(!format!("{key:?}").contains("PRIVATE KEY"));
    }

    #[test]
    fn test_key_missing_fields() {
        let err = ServiceAccountKey::from_json(r#"{"client_email": "a@b"}"#).unwrap_err();
        assert!(matches!(err, DocseedError::Configuration(_)));
    }

    #[test]
    fn test_invalid_private_key() {
        let mut key = key("http://localhost/token");
        key.private_key = secret_string("not a pem".to_string());
        let err = ServiceAccountAuth::new(&key, Client::new()).err().unwrap();
        assert!(err.to_string().contains("Invalid private key"));
    }

    #[tokio::test]
    async fn test_token_exchange_and_cache() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".to_string(), JWT_BEARER_GRANT.to_string()),
                Matcher::Regex("assertion=[A-Za-z0-9_-]+\\.[A-Za-z0-9_-]+\\.".to_string()),
            ]))
            .with_status(200)
            .with_body(r#"{"access_token":"ya29.minted","expires_in":3599,"token_type":"Bearer"}"#)
            .expect(1)
            .create_async()
            .await;

        let auth = ServiceAccountAuth::new(&key(&format!("{}/token", server.url())), Client::new())
            .unwrap();

        let first = auth.access_token().await.unwrap();
        let second = auth.access_token().await.unwrap();

        mock.assert_async().await;
        assert_eq!(first.expose_secret(), "ya29.minted");
        assert_eq!(second.expose_secret(), "ya29.minted");
    }

    #[tokio::test]
    async fn test_expiring_token_is_refreshed() {
        let mut server = mockito::Server::new_async().await;
        // Lifetime inside the refresh margin, so every call mints again
        let mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(r#"{"access_token":"ya29.short","expires_in":30}"#)
            .expect(2)
            .create_async()
            .await;

        let auth = ServiceAccountAuth::new(&key(&format!("{}/token", server.url())), Client::new())
            .unwrap();
        auth.access_token().await.unwrap();
        auth.access_token().await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalidate_forces_new_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(r#"{"access_token":"ya29.minted","expires_in":3599}"#)
            .expect(2)
            .create_async()
            .await;

        let auth = ServiceAccountAuth::new(&key(&format!("{}/token", server.url())), Client::new())
            .unwrap();
        auth.access_token().await.unwrap();
        auth.invalidate().await;
        auth.access_token().await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_assertion() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant","error_description":"Invalid JWT Signature."}"#)
            .create_async()
            .await;

        let auth = ServiceAccountAuth::new(&key(&format!("{}/token", server.url())), Client::new())
            .unwrap();
        match auth.access_token().await.unwrap_err() {
            StoreError::Authentication(message) => {
                assert_eq!(
                    message,
                    "Token exchange failed (400): invalid_grant: Invalid JWT Signature."
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
