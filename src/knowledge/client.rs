// file: src/knowledge/client.rs
// description: two-step upload-then-register client for the knowledge service
// reference: https://docs.rs/reqwest/latest/reqwest/multipart

use crate::config::Config;
use crate::error::{Result, SyncError};
use crate::knowledge::models::{AddFileRequest, UploadOutcome, UploadedFile};
use crate::knowledge::retry::RetryPolicy;
use crate::utils::validation::Validator;
use bytes::Bytes;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, RequestBuilder, Response};
use std::path::Path;
use tracing::{debug, error, info, warn};

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Uploads files and registers them into one knowledge collection.
///
/// Every call is sequential: a file is fully uploaded and registered before the
/// caller moves on to the next one.
pub struct KnowledgeUploader {
    client: Client,
    base_url: String,
    token: String,
    collection_id: String,
    retry: RetryPolicy,
}

impl KnowledgeUploader {
    pub fn new(config: &Config) -> Result<Self> {
        let knowledge = &config.knowledge;
        let client = Client::builder()
            .timeout(knowledge.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: knowledge.base_url.trim_end_matches('/').to_string(),
            token: knowledge.token.clone(),
            collection_id: knowledge.collection_id.clone(),
            retry: RetryPolicy::from_config(knowledge),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn files_url(&self) -> String {
        format!("{}/api/v1/files/", self.base_url)
    }

    pub fn add_file_url(&self) -> String {
        format!(
            "{}/api/v1/knowledge/{}/file/add",
            self.base_url, self.collection_id
        )
    }

    /// Upload `path` and register it into the collection.
    ///
    /// Never fails: errors are logged and reported through the outcome. The
    /// registration call is only made once the upload returned a file id.
    pub async fn upload(&self, path: &Path) -> UploadOutcome {
        let file_id = match self.upload_file(path).await {
            Ok(file_id) => {
                info!("Upload successful: {}", path.display());
                file_id
            }
            Err(e) => {
                error!("Error uploading file {}: {}", path.display(), e);
                return UploadOutcome::UploadFailed;
            }
        };

        match self.add_file_to_knowledge(&file_id).await {
            Ok(()) => {
                info!("File {} added to knowledge base.", file_id);
                UploadOutcome::Registered { file_id }
            }
            Err(e) => {
                error!("Error adding file {} to knowledge base: {}", file_id, e);
                UploadOutcome::RegistrationFailed { file_id }
            }
        }
    }

    /// Step one: multipart upload, returning the remote file id.
    pub async fn upload_file(&self, path: &Path) -> Result<String> {
        Validator::validate_file_path(path)?;

        let bytes: Bytes = tokio::fs::read(path)
            .await
            .map_err(|source| SyncError::FileRead {
                path: path.to_path_buf(),
                source,
            })?
            .into();
        let length = bytes.len() as u64;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        debug!("Uploading {} ({} bytes)", path.display(), length);

        let url = self.files_url();
        let response = self
            .send_with_retry("upload", || {
                // Bytes clones share the buffer, so a retry does not copy the file.
                let part = Part::stream_with_length(Body::from(bytes.clone()), length)
                    .file_name(file_name.clone());
                self.client
                    .post(&url)
                    .bearer_auth(&self.token)
                    .header(ACCEPT, "application/json")
                    .multipart(Form::new().part("file", part))
            })
            .await?;

        let uploaded: UploadedFile = response.json().await?;
        uploaded.file_id().ok_or(SyncError::MissingFileId)
    }

    /// Step two: attach an uploaded file to the collection.
    pub async fn add_file_to_knowledge(&self, file_id: &str) -> Result<()> {
        let url = self.add_file_url();
        let body = AddFileRequest { file_id };

        self.send_with_retry("register", || {
            self.client
                .post(&url)
                .bearer_auth(&self.token)
                .json(&body)
        })
        .await?;

        Ok(())
    }

    async fn send_with_retry<F>(&self, operation: &str, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;

        loop {
            match build().send().await {
                Ok(response) if response.status().is_success() => {
                    if attempt > 0 {
                        info!(operation, attempt, "Request succeeded after retry");
                    }
                    return Ok(response);
                }
                Ok(response) => {
                    let status = response.status();
                    if attempt >= self.retry.max_retries
                        || !RetryPolicy::is_transient_status(status)
                    {
                        let body = response.text().await.unwrap_or_default();
                        return Err(SyncError::RemoteStatus {
                            status,
                            body: Validator::truncate_text(&body, MAX_ERROR_BODY_CHARS),
                        });
                    }
                    warn!(operation, attempt, %status, "Transient response from knowledge service");
                }
                Err(e) => {
                    if attempt >= self.retry.max_retries || !RetryPolicy::is_transient_error(&e) {
                        return Err(e.into());
                    }
                    warn!(operation, attempt, error = %e, "Transient transport failure");
                }
            }

            let delay = self.retry.backoff_for(attempt);
            debug!(operation, delay_ms = delay.as_millis() as u64, "Backing off before retry");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
