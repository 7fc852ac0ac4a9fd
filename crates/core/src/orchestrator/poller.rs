//! Status polling for accepted generation jobs.
//!
//! `PollSession` is the pure bookkeeping: the attempt budget and the
//! zero-progress streak that identifies stuck jobs. `StatusPoller` drives a
//! session against a live client, sleeping one interval before every check.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::generation::{GenerationClient, JobHandle, JobState, PollSnapshot};
use crate::metrics;

use super::config::OrchestratorConfig;
use super::types::JobError;

/// Terminal verdict of one polling session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEnd {
    Succeeded(Vec<String>),
    Failed(String),
    Stuck { zero_polls: u32 },
    Exhausted { attempts: u32 },
}

/// Attempt and streak bookkeeping for one job.
///
/// Rules, in the order they apply on every tick:
/// 1. every observation or transient error consumes one attempt
/// 2. an explicit zero progress report extends the streak, any other
///    reported value resets it, an unreadable value leaves it unchanged
/// 3. the stuck check runs before the budget check
pub struct PollSession {
    max_attempts: u32,
    stuck_threshold: u32,
    attempts: u32,
    zero_streak: u32,
}

impl PollSession {
    pub fn new(max_attempts: u32, stuck_threshold: u32) -> Self {
        Self {
            max_attempts,
            stuck_threshold,
            attempts: 0,
            zero_streak: 0,
        }
    }

    /// Attempts consumed so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Feed one status snapshot. Returns the verdict once the session ends.
    pub fn observe(&mut self, snapshot: &PollSnapshot) -> Option<SessionEnd> {
        self.attempts += 1;

        match snapshot.state {
            JobState::Succeeded => {
                if snapshot.result_urls.is_empty() {
                    return Some(SessionEnd::Failed(
                        "service reported success but returned no images".to_string(),
                    ));
                }
                return Some(SessionEnd::Succeeded(snapshot.result_urls.clone()));
            }
            JobState::Failed => {
                let reason = snapshot
                    .failure_reason
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string());
                return Some(SessionEnd::Failed(reason));
            }
            JobState::Pending => {}
        }

        match snapshot.progress {
            Some(p) if p == 0.0 => self.zero_streak += 1,
            Some(_) => self.zero_streak = 0,
            None => {}
        }

        self.check_limits()
    }

    /// Record a failed status fetch. Consumes an attempt; the streak is
    /// left unchanged.
    pub fn note_transient(&mut self) -> Option<SessionEnd> {
        self.attempts += 1;
        if self.attempts >= self.max_attempts {
            return Some(SessionEnd::Exhausted {
                attempts: self.attempts,
            });
        }
        None
    }

    fn check_limits(&self) -> Option<SessionEnd> {
        if self.zero_streak >= self.stuck_threshold {
            return Some(SessionEnd::Stuck {
                zero_polls: self.zero_streak,
            });
        }
        if self.attempts >= self.max_attempts {
            return Some(SessionEnd::Exhausted {
                attempts: self.attempts,
            });
        }
        None
    }
}

/// Drives one polling session against the generation service.
pub struct StatusPoller {
    client: Arc<dyn GenerationClient>,
    interval: Duration,
    max_attempts: u32,
    stuck_threshold: u32,
}

impl StatusPoller {
    pub fn new(client: Arc<dyn GenerationClient>, config: &OrchestratorConfig) -> Self {
        Self {
            client,
            interval: Duration::from_millis(config.poll_interval_ms),
            max_attempts: config.max_poll_attempts,
            stuck_threshold: config.stuck_threshold,
        }
    }

    /// Poll until the job finishes or the session limits trip.
    ///
    /// The first check happens one interval after submission. The service is
    /// eventually consistent, so a handle may be unknown right after submit;
    /// that surfaces as a transient error and costs only the attempt.
    pub async fn poll(&self, handle: &JobHandle, label: &str) -> Result<Vec<String>, JobError> {
        let mut session = PollSession::new(self.max_attempts, self.stuck_threshold);

        loop {
            tokio::time::sleep(self.interval).await;
            metrics::POLL_TICKS.inc();

            let end = match self.client.fetch_status(handle).await {
                Ok(snapshot) => {
                    debug!(
                        "Job {} ({}): {} progress={:?}",
                        handle,
                        label,
                        snapshot.state.as_str(),
                        snapshot.progress
                    );
                    session.observe(&snapshot)
                }
                Err(e) => {
                    metrics::TRANSIENT_POLL_ERRORS.inc();
                    warn!("Status check failed for job {} ({}): {}", handle, label, e);
                    session.note_transient()
                }
            };

            match end {
                None => continue,
                Some(SessionEnd::Succeeded(urls)) => return Ok(urls),
                Some(SessionEnd::Failed(reason)) => return Err(JobError::Remote(reason)),
                Some(SessionEnd::Stuck { zero_polls }) => {
                    return Err(JobError::Stuck { zero_polls })
                }
                Some(SessionEnd::Exhausted { attempts }) => {
                    return Err(JobError::Exhausted { attempts })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{GenerationClientError, JobSpec, SubmitOutcome};
    use crate::testing::{MockGenerationClient, ScriptedJob};

    fn zero_progress() -> PollSnapshot {
        PollSnapshot::pending(Some(0.0))
    }

    #[test]
    fn test_succeeds_on_result() {
        let mut session = PollSession::new(40, 15);
        let end = session.observe(&PollSnapshot::succeeded(vec![
            "https://img.example/1.png".to_string(),
        ]));
        assert_eq!(
            end,
            Some(SessionEnd::Succeeded(vec![
                "https://img.example/1.png".to_string()
            ]))
        );
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn test_success_without_urls_is_failure() {
        let mut session = PollSession::new(40, 15);
        let end = session.observe(&PollSnapshot::succeeded(vec![]));
        assert_eq!(
            end,
            Some(SessionEnd::Failed(
                "service reported success but returned no images".to_string()
            ))
        );
    }

    #[test]
    fn test_failed_snapshot_carries_reason() {
        let mut session = PollSession::new(40, 15);
        let end = session.observe(&PollSnapshot::failed("content policy"));
        assert_eq!(end, Some(SessionEnd::Failed("content policy".to_string())));
    }

    #[test]
    fn test_failed_snapshot_without_reason_defaults() {
        let mut session = PollSession::new(40, 15);
        let snapshot = PollSnapshot {
            state: JobState::Failed,
            progress: None,
            result_urls: vec![],
            failure_reason: None,
        };
        assert_eq!(
            session.observe(&snapshot),
            Some(SessionEnd::Failed("Unknown".to_string()))
        );
    }

    #[test]
    fn test_stuck_after_threshold_zero_polls() {
        let mut session = PollSession::new(100, 15);
        for _ in 0..14 {
            assert_eq!(session.observe(&zero_progress()), None);
        }
        assert_eq!(
            session.observe(&zero_progress()),
            Some(SessionEnd::Stuck { zero_polls: 15 })
        );
    }

    #[test]
    fn test_nonzero_progress_resets_streak() {
        let mut session = PollSession::new(100, 15);
        for _ in 0..14 {
            assert_eq!(session.observe(&zero_progress()), None);
        }
        assert_eq!(session.observe(&PollSnapshot::pending(Some(0.35))), None);

        // The streak starts over; 14 more zeros are not enough.
        for _ in 0..14 {
            assert_eq!(session.observe(&zero_progress()), None);
        }
        assert_eq!(
            session.observe(&zero_progress()),
            Some(SessionEnd::Stuck { zero_polls: 15 })
        );
    }

    #[test]
    fn test_unreadable_progress_leaves_streak() {
        let mut session = PollSession::new(100, 15);
        for _ in 0..14 {
            assert_eq!(session.observe(&zero_progress()), None);
        }
        assert_eq!(session.observe(&PollSnapshot::pending(None)), None);
        assert_eq!(
            session.observe(&zero_progress()),
            Some(SessionEnd::Stuck { zero_polls: 15 })
        );
    }

    #[test]
    fn test_exhausted_at_budget() {
        let mut session = PollSession::new(5, 15);
        for _ in 0..4 {
            assert_eq!(session.observe(&PollSnapshot::pending(Some(0.5))), None);
        }
        assert_eq!(
            session.observe(&PollSnapshot::pending(Some(0.5))),
            Some(SessionEnd::Exhausted { attempts: 5 })
        );
    }

    #[test]
    fn test_stuck_wins_over_exhausted() {
        // Both limits trip on the same tick; stuck is checked first so the
        // job stays eligible for a retry.
        let mut session = PollSession::new(15, 15);
        for _ in 0..14 {
            assert_eq!(session.observe(&zero_progress()), None);
        }
        assert_eq!(
            session.observe(&zero_progress()),
            Some(SessionEnd::Stuck { zero_polls: 15 })
        );
    }

    #[test]
    fn test_transient_consumes_budget() {
        let mut session = PollSession::new(3, 15);
        assert_eq!(session.note_transient(), None);
        assert_eq!(session.note_transient(), None);
        assert_eq!(
            session.note_transient(),
            Some(SessionEnd::Exhausted { attempts: 3 })
        );
    }

    #[test]
    fn test_transient_preserves_streak() {
        let mut session = PollSession::new(100, 3);
        assert_eq!(session.observe(&zero_progress()), None);
        assert_eq!(session.observe(&zero_progress()), None);
        assert_eq!(session.note_transient(), None);
        assert_eq!(
            session.observe(&zero_progress()),
            Some(SessionEnd::Stuck { zero_polls: 3 })
        );
    }

    fn fast_config() -> OrchestratorConfig {
        OrchestratorConfig {
            poll_interval_ms: 5,
            max_poll_attempts: 40,
            stuck_threshold: 15,
            ..Default::default()
        }
    }

    async fn accepted_handle(client: &MockGenerationClient) -> JobHandle {
        let outcome = client
            .submit(&JobSpec::new(0, "Standard", "a van"))
            .await
            .unwrap();
        match outcome {
            SubmitOutcome::Accepted(handle) => handle,
            SubmitOutcome::Completed(_) => panic!("expected an accepted job"),
        }
    }

    #[tokio::test]
    async fn test_poll_returns_result_urls() {
        let client = Arc::new(MockGenerationClient::new());
        client
            .script(
                ScriptedJob::accepted()
                    .then(PollSnapshot::pending(Some(0.4)))
                    .then(PollSnapshot::succeeded(vec![
                        "https://img.example/1.png".to_string(),
                    ])),
            )
            .await;

        let handle = accepted_handle(&client).await;
        let poller = StatusPoller::new(client.clone(), &fast_config());
        let urls = poller.poll(&handle, "Standard").await.unwrap();

        assert_eq!(urls, vec!["https://img.example/1.png".to_string()]);
        assert_eq!(client.total_poll_count().await, 2);
    }

    #[tokio::test]
    async fn test_poll_survives_transient_error() {
        let client = Arc::new(MockGenerationClient::new());
        client
            .script(
                ScriptedJob::accepted()
                    .then_error(GenerationClientError::ConnectionFailed("refused".into()))
                    .then(PollSnapshot::succeeded(vec![
                        "https://img.example/1.png".to_string(),
                    ])),
            )
            .await;

        let handle = accepted_handle(&client).await;
        let poller = StatusPoller::new(client.clone(), &fast_config());
        let urls = poller.poll(&handle, "Standard").await.unwrap();

        assert_eq!(urls.len(), 1);
        assert_eq!(client.total_poll_count().await, 2);
    }

    #[tokio::test]
    async fn test_poll_maps_remote_failure() {
        let client = Arc::new(MockGenerationClient::new());
        client
            .script(ScriptedJob::accepted().then(PollSnapshot::failed("content policy")))
            .await;

        let handle = accepted_handle(&client).await;
        let poller = StatusPoller::new(client.clone(), &fast_config());
        let err = poller.poll(&handle, "Standard").await.unwrap_err();

        assert!(matches!(err, JobError::Remote(ref r) if r == "content policy"));
    }
}
