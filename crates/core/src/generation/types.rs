//! Types for remote generation service operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur talking to the generation service.
#[derive(Debug, Error)]
pub enum GenerationClientError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("API error: {message} (code {code})")]
    Api { code: i64, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// One render request: an immutable prompt plus attribution metadata.
///
/// The slot index fixes the job's position in the batch output regardless
/// of completion order. The label is purely for logs and error messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    /// Output position within the batch.
    pub slot: usize,
    /// Human-readable label used in logs and per-job errors.
    pub label: String,
    /// Full prompt text sent to the service.
    pub prompt: String,
    /// Optional reference image (e.g. an uploaded logo) shared by the batch.
    pub reference_image_url: Option<String>,
}

impl JobSpec {
    /// Create a spec with no reference image.
    pub fn new(slot: usize, label: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            slot,
            label: label.into(),
            prompt: prompt.into(),
            reference_image_url: None,
        }
    }

    /// Attach a reference image URL.
    pub fn with_reference_image(mut self, url: impl Into<String>) -> Self {
        self.reference_image_url = Some(url.into());
        self
    }
}

/// Remote-assigned task identifier. Opaque; owned by one polling session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote-reported state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Queued or rendering.
    Pending,
    /// Finished with results.
    Succeeded,
    /// Remote reported a terminal failure.
    Failed,
}

impl JobState {
    /// String representation for logs and API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
        }
    }
}

/// One status observation, replaced wholesale on every poll tick.
///
/// `progress` is `None` when the service reported a value that could not be
/// interpreted; an absent value normalizes to 0 upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollSnapshot {
    pub state: JobState,
    pub progress: Option<f64>,
    pub result_urls: Vec<String>,
    pub failure_reason: Option<String>,
}

impl PollSnapshot {
    /// A still-running observation.
    pub fn pending(progress: Option<f64>) -> Self {
        Self {
            state: JobState::Pending,
            progress,
            result_urls: Vec::new(),
            failure_reason: None,
        }
    }

    /// A successful terminal observation.
    pub fn succeeded(result_urls: Vec<String>) -> Self {
        Self {
            state: JobState::Succeeded,
            progress: None,
            result_urls,
            failure_reason: None,
        }
    }

    /// A failed terminal observation.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            state: JobState::Failed,
            progress: None,
            result_urls: Vec::new(),
            failure_reason: Some(reason.into()),
        }
    }
}

/// What a submission produced.
///
/// Some requests complete synchronously: the service answers with the result
/// inline instead of a task id, and no polling session is needed.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The service accepted the job; poll the handle for completion.
    Accepted(JobHandle),
    /// The service rendered inline; these are the final result URLs.
    Completed(Vec<String>),
}

/// Client for a remote image generation service.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Submit one job. Returns a handle to poll, or the finished result if
    /// the service completed the request inline.
    async fn submit(&self, spec: &JobSpec) -> Result<SubmitOutcome, GenerationClientError>;

    /// Fetch the current status of a previously accepted job.
    ///
    /// Transport and HTTP-level failures are errors; a job that the remote
    /// reports as failed is a successful fetch of a `Failed` snapshot.
    async fn fetch_status(&self, handle: &JobHandle) -> Result<PollSnapshot, GenerationClientError>;
}
