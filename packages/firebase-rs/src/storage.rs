//! Object upload and deletion against the Cloud Storage REST API.
//!
//! Uploads sign in anonymously first when no session exists, then retry
//! transient failures with a linearly increasing backoff (1s, 2s, 3s)
//! before surfacing a terminal error.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::auth::AuthClient;
use crate::error::{status_error, FirebaseError, Result};

const BASE_URL: &str = "https://firebasestorage.googleapis.com/v0";

/// Upload retry budget. The first attempt is free; this many retries follow.
const MAX_UPLOAD_RETRIES: u32 = 3;

/// A successfully stored object with its resolvable download URL.
#[derive(Debug, Clone)]
pub struct UploadedObject {
    pub path: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    name: String,
    #[serde(rename = "downloadTokens")]
    download_tokens: Option<String>,
}

/// Client for one storage bucket. Requires a session (anonymous is fine)
/// for every mutating call.
pub struct StorageClient {
    client: reqwest::Client,
    bucket: String,
    auth: Arc<AuthClient>,
}

impl StorageClient {
    pub fn new(bucket: impl Into<String>, auth: Arc<AuthClient>) -> Self {
        Self {
            client: reqwest::Client::new(),
            bucket: bucket.into(),
            auth,
        }
    }

    /// Upload a blob under `path`, retrying transient failures.
    ///
    /// A failed sign-in aborts immediately with an authentication error;
    /// permission failures are never retried.
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadedObject> {
        let session = self.auth.ensure_session().await?;
        let token = session.id_token;

        debug!(path, size = bytes.len(), content_type, "starting upload");

        let uploaded = with_retries(MAX_UPLOAD_RETRIES, || {
            self.try_upload(path, &bytes, content_type, &token)
        })
        .await?;

        info!(path = %uploaded.path, "upload complete");
        Ok(uploaded)
    }

    async fn try_upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
        id_token: &str,
    ) -> Result<UploadedObject> {
        let url = format!(
            "{}/b/{}/o?name={}",
            BASE_URL,
            self.bucket,
            urlencoding::encode(path)
        );

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Firebase {id_token}"))
            .header("Content-Type", content_type)
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, path, &body));
        }

        let metadata: UploadResponse = resp
            .json()
            .await
            .map_err(|e| FirebaseError::Parse(format!("upload response: {e}")))?;

        Ok(UploadedObject {
            url: self.download_url(&metadata.name, metadata.download_tokens.as_deref()),
            path: metadata.name,
            uploaded_at: Utc::now(),
        })
    }

    /// Public download URL for an object.
    pub fn download_url(&self, path: &str, token: Option<&str>) -> String {
        let base = format!(
            "{}/b/{}/o/{}?alt=media",
            BASE_URL,
            self.bucket,
            urlencoding::encode(path)
        );
        match token {
            Some(token) => format!("{base}&token={token}"),
            None => base,
        }
    }

    /// Remove an object. Errors propagate; callers decide whether a failed
    /// delete is fatal.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let session = self.auth.ensure_session().await?;
        let url = format!(
            "{}/b/{}/o/{}",
            BASE_URL,
            self.bucket,
            urlencoding::encode(path)
        );

        let resp = self
            .client
            .delete(&url)
            .header("Authorization", format!("Firebase {}", session.id_token))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, path, &body));
        }

        debug!(path, "object deleted");
        Ok(())
    }
}

/// Run `operation`, retrying transient failures up to `max_retries` times
/// with a linearly increasing delay. Non-transient errors surface untouched;
/// an exhausted budget wraps the last cause in `RetriesExhausted`.
async fn with_retries<T, F, Fut>(max_retries: u32, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < max_retries => {
                attempt += 1;
                warn!(attempt, max_retries, error = %err, "transient failure, backing off");
                tokio::time::sleep(Duration::from_secs(u64::from(attempt))).await;
            }
            Err(err) if err.is_transient() => {
                return Err(FirebaseError::RetriesExhausted {
                    attempts: max_retries,
                    source: Box::new(err),
                });
            }
            Err(err) => return Err(err),
        }
    }
}
