//! KIE file storage client implementation.
//!
//! Uploads logos as base64 JSON payloads. The endpoint accepts either a
//! `data:` URL or raw base64 depending on deployment, so the `data:` form
//! goes first and a rejection earns one retry with the raw form. Transport
//! failures are not retried.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::GenerationConfig;

use super::{AssetStore, AssetStoreError, UploadRequest};

/// Uploads reference images to the KIE file store.
pub struct KieAssetStore {
    client: Client,
    config: GenerationConfig,
}

/// Upload request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadBody<'a> {
    base64_data: &'a str,
    upload_path: &'a str,
    file_name: &'a str,
}

impl KieAssetStore {
    /// Create a new store from explicit configuration.
    pub fn new(config: GenerationConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn api_key(&self) -> &str {
        self.config.api_key.as_deref().unwrap_or_default()
    }

    async fn post_upload(
        &self,
        base64_data: &str,
        file_name: &str,
    ) -> Result<Value, AssetStoreError> {
        let body = UploadBody {
            base64_data,
            upload_path: "logos",
            file_name,
        };

        let response = self
            .client
            .post(&self.config.upload_url)
            .bearer_auth(self.api_key())
            .json(&body)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| AssetStoreError::InvalidResponse(e.to_string()))?;

        debug!("Upload response: {}", payload);

        let body_code = payload.get("code").and_then(Value::as_i64);
        if !status.is_success() || body_code.map(|c| c != 200).unwrap_or(false) {
            let message = payload
                .get("msg")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| payload.to_string());
            return Err(AssetStoreError::UploadRejected(message));
        }

        Ok(payload)
    }
}

#[async_trait]
impl AssetStore for KieAssetStore {
    fn name(&self) -> &str {
        "kie"
    }

    async fn upload_image(&self, request: &UploadRequest) -> Result<String, AssetStoreError> {
        let raw = BASE64.encode(&request.bytes);
        let file_name = format!(
            "logo-{}.{}",
            Utc::now().timestamp_millis(),
            request.extension()
        );
        let data_url = format!("data:{};base64,{}", request.mime_type(), raw);

        info!(
            "Uploading logo {} ({} bytes) as {}",
            request.file_name,
            request.bytes.len(),
            file_name
        );

        let payload = match self.post_upload(&data_url, &file_name).await {
            Ok(payload) => payload,
            Err(AssetStoreError::UploadRejected(reason)) => {
                warn!(
                    "Data URL upload rejected ({}), retrying with raw base64",
                    reason
                );
                self.post_upload(&raw, &file_name).await?
            }
            Err(e) => return Err(e),
        };

        decode_upload_response(&payload)
    }
}

/// Map reqwest transport errors into store errors.
fn map_request_error(err: reqwest::Error) -> AssetStoreError {
    if err.is_timeout() {
        AssetStoreError::Timeout(err.to_string())
    } else {
        AssetStoreError::ConnectionFailed(err.to_string())
    }
}

/// Pull the uploaded file URL out of the response. The API moves it around:
/// under `data` or at the root, named `fileUrl`, `downloadUrl` or `url`.
fn decode_upload_response(payload: &Value) -> Result<String, AssetStoreError> {
    let container = match payload.get("data") {
        Some(data) if data.is_object() => data,
        _ => payload,
    };

    for field in ["fileUrl", "downloadUrl", "url"] {
        if let Some(url) = container.get(field).and_then(Value::as_str) {
            if !url.is_empty() {
                return Ok(url.to_string());
            }
        }
    }

    Err(AssetStoreError::InvalidResponse(format!(
        "upload returned no file URL: {}",
        container
    )))
}
