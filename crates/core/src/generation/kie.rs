//! KIE generation service client implementation.
//!
//! Talks to the gpt4o-image API: one POST to submit a render, one GET per
//! poll tick. The API is loosely shaped (task ids and results show up under
//! different field names depending on the call path), so both responses go
//! through explicit decoders that try the known shapes in priority order and
//! fail closed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::GenerationConfig;

use super::{
    GenerationClient, GenerationClientError, JobHandle, JobSpec, PollSnapshot, SubmitOutcome,
};

/// Client for the KIE gpt4o-image API.
pub struct KieClient {
    client: Client,
    config: GenerationConfig,
}

/// Submit request body.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    size: &'a str,
    #[serde(rename = "nVariants")]
    n_variants: u32,
    #[serde(rename = "filesUrl", skip_serializing_if = "Option::is_none")]
    files_url: Option<Vec<&'a str>>,
}

impl KieClient {
    /// Create a new client from explicit configuration.
    pub fn new(config: GenerationConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn api_key(&self) -> &str {
        self.config.api_key.as_deref().unwrap_or_default()
    }
}

#[async_trait]
impl GenerationClient for KieClient {
    fn name(&self) -> &str {
        "kie"
    }

    async fn submit(&self, spec: &JobSpec) -> Result<SubmitOutcome, GenerationClientError> {
        let url = format!("{}/generate", self.base_url());

        let body = GenerateRequest {
            prompt: &spec.prompt,
            size: &self.config.image_size,
            n_variants: 1,
            files_url: spec
                .reference_image_url
                .as_deref()
                .map(|logo| vec![logo]),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key())
            .json(&body)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| GenerationClientError::InvalidResponse(e.to_string()))?;

        debug!("[{}] submit response: {}", spec.label, payload);

        check_envelope(status.as_u16(), &payload)?;
        decode_submit_response(&payload)
    }

    async fn fetch_status(&self, handle: &JobHandle) -> Result<PollSnapshot, GenerationClientError> {
        let url = format!("{}/record-info", self.base_url());

        let response = self
            .client
            .get(&url)
            .query(&[("taskId", handle.as_str())])
            .bearer_auth(self.api_key())
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationClientError::Api {
                code: status.as_u16() as i64,
                message: format!("HTTP {}", status),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GenerationClientError::InvalidResponse(e.to_string()))?;

        Ok(decode_status_response(&payload))
    }
}

/// Map reqwest transport errors into client errors.
fn map_request_error(err: reqwest::Error) -> GenerationClientError {
    if err.is_timeout() {
        GenerationClientError::Timeout(err.to_string())
    } else {
        GenerationClientError::ConnectionFailed(err.to_string())
    }
}

/// Reject non-success envelopes: HTTP error status, or a body `code` other
/// than 200. The error message prefers `msg`, then `message`.
fn check_envelope(http_status: u16, payload: &Value) -> Result<(), GenerationClientError> {
    let body_code = payload.get("code").and_then(Value::as_i64);
    let http_ok = (200..300).contains(&http_status);

    if http_ok && body_code.map(|c| c == 200).unwrap_or(true) {
        return Ok(());
    }

    let message = payload
        .get("msg")
        .and_then(Value::as_str)
        .or_else(|| payload.get("message").and_then(Value::as_str))
        .unwrap_or("Unknown")
        .to_string();

    Err(GenerationClientError::Api {
        code: body_code.unwrap_or(http_status as i64),
        message,
    })
}

/// Decode a submit response, trying known shapes in priority order:
/// `data.taskId`, top-level `taskId`, `data[0].url`, `data.url`. Anything
/// else fails closed.
fn decode_submit_response(payload: &Value) -> Result<SubmitOutcome, GenerationClientError> {
    let data = payload.get("data");

    let task_id = data
        .and_then(|d| d.get("taskId"))
        .and_then(Value::as_str)
        .or_else(|| payload.get("taskId").and_then(Value::as_str));

    if let Some(id) = task_id {
        return Ok(SubmitOutcome::Accepted(JobHandle::new(id)));
    }

    let inline_url = data
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|item| item.get("url"))
        .and_then(Value::as_str)
        .or_else(|| data.and_then(|d| d.get("url")).and_then(Value::as_str));

    if let Some(url) = inline_url {
        return Ok(SubmitOutcome::Completed(vec![url.to_string()]));
    }

    Err(GenerationClientError::InvalidResponse(format!(
        "no task id or inline result in submit response: {}",
        payload
    )))
}

/// Decode a status response into a snapshot.
///
/// `successFlag` 1 with body code 200 is success (urls under `resultUrls` or
/// `result_urls`), flag 2 is a remote failure, everything else is pending.
fn decode_status_response(payload: &Value) -> PollSnapshot {
    let code = payload.get("code").and_then(Value::as_i64);
    let data = payload.get("data");
    let flag = data.and_then(|d| d.get("successFlag")).and_then(Value::as_i64);

    if code == Some(200) && flag == Some(1) {
        let response = data.and_then(|d| d.get("response"));
        let urls = response
            .and_then(|r| r.get("resultUrls"))
            .or_else(|| response.and_then(|r| r.get("result_urls")))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        return PollSnapshot::succeeded(urls);
    }

    if flag == Some(2) {
        let reason = data
            .and_then(|d| d.get("errorMessage"))
            .and_then(Value::as_str)
            .or_else(|| data.and_then(|d| d.get("failMsg")).and_then(Value::as_str))
            .unwrap_or("Unknown")
            .to_string();
        return PollSnapshot::failed(reason);
    }

    PollSnapshot::pending(parse_progress(data.and_then(|d| d.get("progress"))))
}

/// Parse the progress field, which arrives as a string or a number.
///
/// Absent, null or empty values normalize to 0 (still queued); a value that
/// is present but unparseable is reported as unknown.
fn parse_progress(value: Option<&Value>) -> Option<f64> {
    match value {
        None | Some(Value::Null) => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.is_empty() => Some(0.0),
        Some(Value::String(s)) => s.parse().ok(),
        Some(_) => None,
    }
}
