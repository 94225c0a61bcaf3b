use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use super::credential_cache::{CredentialCache, CREDENTIAL_TTL_SECS};
use super::error::AuthError;
use crate::core::config::StorageConfig;

/// Response header carrying the issued token
const SUBJECT_TOKEN_HEADER: &str = "x-subject-token";

/// Keystone domain used for both the user and the project scope
const DEFAULT_DOMAIN: &str = "default";

/// Performs the password handshake against the identity endpoint
///
/// Every successful handshake overwrites the single shared cache entry.
/// Failures are returned as-is; retrying is left to the caller.
pub struct TokenProvider {
    http_client: Client,
    auth_url: String,
    username: String,
    password: String,
    project_id: String,
    credentials: CredentialCache,
}

impl TokenProvider {
    pub fn new(config: &StorageConfig, http_client: Client, credentials: CredentialCache) -> Self {
        Self {
            http_client,
            auth_url: config.auth_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            project_id: config.project_id.clone(),
            credentials,
        }
    }

    /// Request body for a project-scoped password authentication
    fn identity_request(&self) -> Value {
        json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "domain": { "name": DEFAULT_DOMAIN },
                            "name": self.username,
                            "password": self.password,
                        }
                    }
                },
                "scope": {
                    "project": {
                        "domain": { "name": DEFAULT_DOMAIN },
                        "id": self.project_id,
                    }
                }
            }
        })
    }

    /// Authenticate, cache the new token and return it
    pub async fn acquire_token(&self) -> Result<String, AuthError> {
        debug!("Requesting storage token from {}", self.auth_url);

        let response = self
            .http_client
            .post(&self.auth_url)
            .json(&self.identity_request())
            .send()
            .await
            .map_err(|e| {
                error!("Identity endpoint unreachable: {}", e);
                AuthError::Unreachable(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Identity endpoint rejected authentication: HTTP {}", status);
            return Err(AuthError::Rejected { status, body });
        }

        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                error!("Token not found in identity response headers");
                AuthError::MissingToken
            })?;

        self.credentials.set(&token, CREDENTIAL_TTL_SECS).await;
        info!("New storage token fetched and cached");

        Ok(token)
    }
}
