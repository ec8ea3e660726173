//! Remote transform-service client
//!
//! Uploads are signed multipart POSTs to `{api_base}/v1_1/{cloud_name}/{resource}/upload`.
//! The service stores the original, applies the requested transformation and answers with
//! the derived artifact's id, size and duration.

use crate::credentials::StorageCredentials;
use crate::keys;
use crate::traits::{StorageClient, StorageError, StorageResult, StoredAsset};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use reelbox_core::models::MediaKind;
use reelbox_core::TransformOptions;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    bytes: i64,
    #[serde(default)]
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Sign request parameters: SHA-256 over the `k=v` pairs sorted by key and joined with `&`,
/// followed by the API secret. Empty values are excluded.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn map_transport_error(err: reqwest::Error) -> StorageError {
    if err.is_timeout() {
        StorageError::Timeout
    } else {
        StorageError::Unknown(err.to_string())
    }
}

/// Turn a non-success response into the matching error kind.
async fn error_from_response(response: reqwest::Response) -> StorageError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let reason = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body.chars().take(200).collect()
            }
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StorageError::Unknown(format!(
            "storage service refused the credentials ({}): {}",
            status, reason
        )),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => StorageError::Timeout,
        StatusCode::TOO_MANY_REQUESTS => {
            StorageError::Unknown(format!("storage service rate limited: {}", reason))
        }
        s if s.is_client_error() => StorageError::RemoteRejected(reason),
        s => StorageError::Unknown(format!("{}: {}", s, reason)),
    }
}

/// Client for the remote transform service
#[derive(Clone)]
pub struct CloudStorageClient {
    http: reqwest::Client,
    api_base: String,
    root_folder: String,
    credentials: StorageCredentials,
}

impl CloudStorageClient {
    /// Create a client whose every request is bounded by `timeout`.
    pub fn new(
        api_base: impl Into<String>,
        root_folder: impl Into<String>,
        credentials: StorageCredentials,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Unknown(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: api_base.into(),
            root_folder: root_folder.into(),
            credentials,
        })
    }

    fn endpoint(&self, cloud_name: &str, kind: MediaKind, action: &str) -> String {
        format!(
            "{}/v1_1/{}/{}/{}",
            self.api_base.trim_end_matches('/'),
            cloud_name,
            kind.resource_type(),
            action
        )
    }
}

#[async_trait]
impl StorageClient for CloudStorageClient {
    async fn store(
        &self,
        data: Bytes,
        kind: MediaKind,
        options: &TransformOptions,
    ) -> StorageResult<StoredAsset> {
        let creds = self.credentials.require()?;

        let url = self.endpoint(creds.cloud_name, kind, "upload");
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let folder = keys::upload_folder(&self.root_folder, kind);
        let transformation = options.to_transformation();
        let signature = sign_params(
            &[
                ("folder", folder.as_str()),
                ("timestamp", timestamp.as_str()),
                ("transformation", transformation.as_str()),
            ],
            creds.api_secret,
        );

        let size = data.len();
        let file_part = Part::stream_with_length(reqwest::Body::from(data), size as u64)
            .file_name(format!("upload.{}", kind.resource_type()));
        let form = Form::new()
            .part("file", file_part)
            .text("api_key", creds.api_key.to_string())
            .text("timestamp", timestamp)
            .text("folder", folder)
            .text("transformation", transformation)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let start = Instant::now();
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let err = error_from_response(response).await;
            tracing::warn!(
                kind = %kind,
                size_bytes = size,
                error = %err,
                "Storage service rejected upload"
            );
            return Err(err);
        }

        let uploaded: UploadResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                StorageError::Timeout
            } else {
                StorageError::Unknown(format!("Invalid upload response: {}", e))
            }
        })?;

        if uploaded.bytes <= 0 {
            return Err(StorageError::Unknown(format!(
                "storage service reported an empty artifact for {}",
                uploaded.public_id
            )));
        }

        tracing::info!(
            kind = %kind,
            asset_ref = %uploaded.public_id,
            size_bytes = size,
            derived_size_bytes = uploaded.bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloud storage upload successful"
        );

        Ok(StoredAsset {
            asset_ref: uploaded.public_id,
            derived_size_bytes: uploaded.bytes,
            derived_duration_seconds: uploaded.duration.filter(|d| *d >= 0.0).unwrap_or(0.0),
        })
    }

    async fn destroy(&self, asset_ref: &str, kind: MediaKind) -> StorageResult<()> {
        let creds = self.credentials.require()?;

        let url = self.endpoint(creds.cloud_name, kind, "destroy");
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("public_id", asset_ref), ("timestamp", timestamp.as_str())],
            creds.api_secret,
        );

        let response = self
            .http
            .post(&url)
            .form(&[
                ("public_id", asset_ref),
                ("api_key", creds.api_key),
                ("timestamp", timestamp.as_str()),
                ("signature", signature.as_str()),
                ("signature_algorithm", "sha256"),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        tracing::info!(asset_ref = %asset_ref, kind = %kind, "Cloud storage destroy successful");
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Cloud
    }
}
