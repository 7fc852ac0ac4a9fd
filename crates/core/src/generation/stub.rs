//! Stub generation client for running without credentials.
//!
//! Completes every submission inline with a placehold.co URL labeled after
//! the job, after a short artificial delay. Lets the whole request path be
//! exercised locally with no API key.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::{
    GenerationClient, GenerationClientError, JobHandle, JobSpec, PollSnapshot, SubmitOutcome,
};

/// Placeholder color schemes (background, foreground), cycled per slot.
const COLOR_SCHEMES: [(&str, &str); 3] = [
    ("000000", "d4af37"),
    ("1a1a1a", "ffffff"),
    ("333333", "d4af37"),
];

const DEFAULT_DELAY_MS: u64 = 2000;

/// Generation client that renders nothing and answers with placeholders.
pub struct StubGenerationClient {
    delay: Duration,
}

impl Default for StubGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StubGenerationClient {
    pub fn new() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }

    /// Override the artificial delay (tests use 0).
    pub fn with_delay_ms(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }

    fn placeholder_url(spec: &JobSpec) -> String {
        let (background, foreground) = COLOR_SCHEMES[spec.slot % COLOR_SCHEMES.len()];
        format!(
            "https://placehold.co/1024x768/{}/{}?text={}",
            background,
            foreground,
            urlencoding::encode(&spec.label)
        )
    }
}

#[async_trait]
impl GenerationClient for StubGenerationClient {
    fn name(&self) -> &str {
        "stub"
    }

    async fn submit(&self, spec: &JobSpec) -> Result<SubmitOutcome, GenerationClientError> {
        tokio::time::sleep(self.delay).await;
        let url = Self::placeholder_url(spec);
        info!("[{}] stub render: {}", spec.label, url);
        Ok(SubmitOutcome::Completed(vec![url]))
    }

    async fn fetch_status(&self, handle: &JobHandle) -> Result<PollSnapshot, GenerationClientError> {
        // Submissions complete inline, so no handle ever reaches here.
        Err(GenerationClientError::InvalidResponse(format!(
            "stub client has no job {}",
            handle
        )))
    }
}
