//! Object storage gateway
//!
//! Uploads objects with `PUT {base_url}/{folder}/{filename}` and deletes them
//! with a single `POST {base_url}?bulk-delete`. Every request carries the
//! cached `X-Auth-Token`; a 401 invalidates it, re-authenticates once and
//! retries once. A second 401 is terminal.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::{header, Client, Response, StatusCode};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::credential_cache::CredentialCache;
use super::error::StorageError;
use super::path_validator::PathValidator;
use super::token_provider::TokenProvider;
use crate::core::config::StorageConfig;
use crate::modules::cache::CacheService;

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// One file to store; immutable for the lifetime of an upload call
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadRequest {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    fn validate(&self) -> Result<(), StorageError> {
        if self.data.is_empty() {
            return Err(StorageError::FileRequired);
        }
        PathValidator::check_filename(&self.filename)
    }
}

pub struct ObjectStorageGateway {
    http_client: Client,
    base_url: String,
    paths: PathValidator,
    credentials: CredentialCache,
    token_provider: TokenProvider,
    /// Serializes token acquisition so concurrent misses share one handshake
    refresh_lock: Mutex<()>,
}

impl ObjectStorageGateway {
    pub fn new(config: &StorageConfig, cache: Arc<dyn CacheService>) -> Result<Self, StorageError> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StorageError::Client(format!("Failed to create HTTP client: {}", e)))?;

        let credentials = CredentialCache::new(cache);
        let token_provider = TokenProvider::new(config, http_client.clone(), credentials.clone());

        info!(
            "Object storage gateway initialized for {} (container: {})",
            config.base_url, config.container
        );

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            paths: PathValidator::new(config.container.clone()),
            credentials,
            token_provider,
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn container(&self) -> &str {
        self.paths.container()
    }

    /// Public URL an object in `folder` is stored under
    pub fn object_url(&self, folder: &str, filename: &str) -> String {
        let relative = relative_object_path(folder, filename);
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, relative)
        } else {
            format!("{}/{}", self.base_url, relative)
        }
    }

    /// Container-relative path of an object, as the bulk-delete API expects it
    fn object_path(&self, folder: &str, filename: &str) -> String {
        format!(
            "{}/{}",
            self.paths.container(),
            relative_object_path(folder, filename)
        )
    }

    fn bulk_delete_url(&self) -> String {
        format!("{}?bulk-delete", self.base_url)
    }

    /// Cached token, or a fresh one when the cache is empty
    async fn current_token(&self) -> Result<String, StorageError> {
        if let Some(token) = self.credentials.get().await {
            return Ok(token);
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(token) = self.credentials.get().await {
            debug!("Storage token was fetched by a concurrent request");
            return Ok(token);
        }

        warn!("Storage token not found in cache, authenticating");
        Ok(self.token_provider.acquire_token().await?)
    }

    /// Replace a token the storage service rejected
    ///
    /// If another request already swapped the cached token, that one is
    /// reused instead of authenticating again.
    async fn refresh_token(&self, rejected: &str) -> Result<String, StorageError> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(token) = self.credentials.get().await {
            if token != rejected {
                debug!("Storage token was refreshed by a concurrent request");
                return Ok(token);
            }
        }

        self.credentials.invalidate().await;
        Ok(self.token_provider.acquire_token().await?)
    }

    /// Send a request built by `send`, re-authenticating once on 401
    ///
    /// `token` is updated in place so later requests in the same call reuse
    /// the refreshed credential.
    async fn send_authorized<F, Fut>(
        &self,
        token: &mut String,
        send: F,
    ) -> Result<Response, StorageError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<Response, StorageError>>,
    {
        let response = send(token.clone()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        warn!("Storage token expired, deleting cache and retrying with a new token");
        let refreshed = self.refresh_token(token).await?;
        *token = refreshed;
        send(token.clone()).await
    }

    async fn put_object(
        &self,
        url: &str,
        file: &UploadRequest,
        token: &mut String,
    ) -> Result<(), StorageError> {
        let response = self
            .send_authorized(token, |token| {
                let request = self
                    .http_client
                    .put(url)
                    .header(AUTH_TOKEN_HEADER, token)
                    .header(header::CONTENT_TYPE, file.content_type.as_str())
                    .body(file.data.clone());
                async move {
                    request.send().await.map_err(|e| StorageError::Upload {
                        filename: file.filename.clone(),
                        status: None,
                        detail: e.to_string(),
                    })
                }
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Error uploading '{}': HTTP {} - {}", file.filename, status, body);
            return Err(StorageError::Upload {
                filename: file.filename.clone(),
                status: Some(status),
                detail: body,
            });
        }

        debug!("Uploaded '{}' ({} bytes)", url, file.data.len());
        Ok(())
    }

    async fn post_bulk_delete(
        &self,
        paths: &[String],
        token: &mut String,
    ) -> Result<(), StorageError> {
        let url = self.bulk_delete_url();
        let body = paths.join("\n");

        debug!("Bulk deleting {} object(s)", paths.len());

        let response = self
            .send_authorized(token, |token| {
                let request = self
                    .http_client
                    .post(&url)
                    .header(AUTH_TOKEN_HEADER, token)
                    .header(header::CONTENT_TYPE, "text/plain")
                    .body(body.clone());
                async move {
                    request.send().await.map_err(|e| StorageError::Delete {
                        status: None,
                        detail: e.to_string(),
                    })
                }
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Error deleting files: HTTP {} - {}", status, body);
            return Err(StorageError::Delete {
                status: Some(status),
                detail: body,
            });
        }

        Ok(())
    }

    /// Upload a single file and return its public URL
    pub async fn upload_one(
        &self,
        folder: &str,
        file: &UploadRequest,
    ) -> Result<String, StorageError> {
        file.validate()?;

        let folder = PathValidator::upload_folder(folder)?;
        let url = self.object_url(&folder, &file.filename);

        let mut token = self.current_token().await?;
        self.put_object(&url, file, &mut token).await?;

        info!("Uploaded '{}' to {}", file.filename, url);
        Ok(url)
    }

    /// Upload files one after another into the same folder
    ///
    /// All-or-nothing for the caller: if any file fails, the objects already
    /// stored by this call are bulk-deleted (best effort) and the failure is
    /// returned.
    pub async fn upload_many(
        &self,
        folder: &str,
        files: &[UploadRequest],
    ) -> Result<Vec<String>, StorageError> {
        if files.is_empty() {
            return Err(StorageError::FileRequired);
        }
        for file in files {
            file.validate()?;
        }

        let folder = PathValidator::upload_folder(folder)?;
        let mut token = self.current_token().await?;
        let mut urls = Vec::with_capacity(files.len());
        let mut stored = Vec::with_capacity(files.len());

        for file in files {
            let url = self.object_url(&folder, &file.filename);

            if let Err(e) = self.put_object(&url, file, &mut token).await {
                self.rollback(&stored, &mut token).await;
                return Err(e);
            }

            stored.push(self.object_path(&folder, &file.filename));
            urls.push(url);
        }

        info!("Uploaded {} file(s) to folder '{}'", urls.len(), folder);
        Ok(urls)
    }

    /// Remove objects stored by a batch that later failed
    async fn rollback(&self, stored: &[String], token: &mut String) {
        if stored.is_empty() {
            return;
        }

        warn!(
            "Batch upload failed, removing {} already stored object(s)",
            stored.len()
        );

        if let Err(e) = self.post_bulk_delete(stored, token).await {
            error!(
                "Failed to roll back partially uploaded batch {:?}: {}",
                stored, e
            );
        }
    }

    /// Delete objects given as container paths or public URLs
    ///
    /// Every entry is validated before any request is sent; one invalid
    /// entry fails the whole call.
    pub async fn bulk_delete(&self, inputs: &[String]) -> Result<Vec<String>, StorageError> {
        if inputs.is_empty() {
            return Err(StorageError::FileRequired);
        }

        let paths = inputs
            .iter()
            .map(|input| self.paths.normalize_for_delete(input))
            .collect::<Result<Vec<_>, _>>()?;

        let mut token = self.current_token().await?;
        self.post_bulk_delete(&paths, &mut token).await?;

        info!("Deleted {} object(s) from storage", paths.len());
        Ok(paths)
    }
}

/// `{folder}/{filename}` with each segment percent-encoded
fn relative_object_path(folder: &str, filename: &str) -> String {
    folder
        .split('/')
        .filter(|segment| !segment.is_empty())
        .chain(std::iter::once(filename))
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
