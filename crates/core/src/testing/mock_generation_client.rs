//! Mock generation client for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::generation::{
    GenerationClient, GenerationClientError, JobHandle, JobSpec, PollSnapshot, SubmitOutcome,
};

/// One status-check answer: a snapshot or a transport error.
type PollStep = Result<PollSnapshot, GenerationClientError>;

#[derive(Debug)]
enum SubmitScript {
    Accept,
    Complete(Vec<String>),
    Reject(GenerationClientError),
}

/// Script for one submission: what submit answers, then what each status
/// check answers in order.
///
/// When a single snapshot step remains it repeats on every further check,
/// so one trailing pending step simulates a job that never finishes.
#[derive(Debug)]
pub struct ScriptedJob {
    submit: SubmitScript,
    steps: VecDeque<PollStep>,
}

impl ScriptedJob {
    /// The service accepts the job and assigns a task id.
    pub fn accepted() -> Self {
        Self {
            submit: SubmitScript::Accept,
            steps: VecDeque::new(),
        }
    }

    /// The service completes the job inline, no polling needed.
    pub fn completed(urls: Vec<String>) -> Self {
        Self {
            submit: SubmitScript::Complete(urls),
            steps: VecDeque::new(),
        }
    }

    /// The submit call itself fails.
    pub fn rejected(error: GenerationClientError) -> Self {
        Self {
            submit: SubmitScript::Reject(error),
            steps: VecDeque::new(),
        }
    }

    /// Append a status snapshot.
    pub fn then(mut self, snapshot: PollSnapshot) -> Self {
        self.steps.push_back(Ok(snapshot));
        self
    }

    /// Append a failing status check.
    pub fn then_error(mut self, error: GenerationClientError) -> Self {
        self.steps.push_back(Err(error));
        self
    }
}

/// Mock implementation of the GenerationClient trait.
///
/// Submissions consume scripts in the order they were queued; accepted jobs
/// get sequential `task-N` handles whose status checks replay the script.
///
/// # Example
///
/// ```rust,ignore
/// let client = MockGenerationClient::new();
/// client
///     .script(
///         ScriptedJob::accepted()
///             .then(PollSnapshot::pending(Some(0.3)))
///             .then(PollSnapshot::succeeded(vec!["https://img/1.png".into()])),
///     )
///     .await;
///
/// // submit() -> Accepted("task-1"); two status checks walk the script
/// ```
#[derive(Debug, Default)]
pub struct MockGenerationClient {
    /// Scripts waiting for the next submissions.
    scripts: Arc<RwLock<VecDeque<ScriptedJob>>>,
    /// Recorded submit calls.
    submitted: Arc<RwLock<Vec<JobSpec>>>,
    /// Remaining status answers per accepted task.
    jobs: Arc<RwLock<HashMap<String, VecDeque<PollStep>>>>,
    /// Status checks made across all tasks.
    poll_count: Arc<RwLock<usize>>,
    /// Counter for generating task ids.
    task_counter: Arc<RwLock<u32>>,
}

impl MockGenerationClient {
    /// Create a new mock client with no scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the script for the next submission.
    pub async fn script(&self, job: ScriptedJob) {
        self.scripts.write().await.push_back(job);
    }

    /// Get all recorded submit calls.
    pub async fn submitted_specs(&self) -> Vec<JobSpec> {
        self.submitted.read().await.clone()
    }

    /// Number of submit calls made.
    pub async fn submit_count(&self) -> usize {
        self.submitted.read().await.len()
    }

    /// Number of status checks made across all tasks.
    pub async fn total_poll_count(&self) -> usize {
        *self.poll_count.read().await
    }

    /// Number of scripts not yet consumed by a submission.
    pub async fn remaining_scripts(&self) -> usize {
        self.scripts.read().await.len()
    }

    async fn next_task_id(&self) -> String {
        let mut counter = self.task_counter.write().await;
        *counter += 1;
        format!("task-{}", *counter)
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn submit(&self, spec: &JobSpec) -> Result<SubmitOutcome, GenerationClientError> {
        self.submitted.write().await.push(spec.clone());

        let Some(job) = self.scripts.write().await.pop_front() else {
            return Err(GenerationClientError::InvalidResponse(
                "no scripted job for submission".to_string(),
            ));
        };

        match job.submit {
            SubmitScript::Reject(error) => Err(error),
            SubmitScript::Complete(urls) => Ok(SubmitOutcome::Completed(urls)),
            SubmitScript::Accept => {
                let task_id = self.next_task_id().await;
                self.jobs.write().await.insert(task_id.clone(), job.steps);
                Ok(SubmitOutcome::Accepted(JobHandle::new(task_id)))
            }
        }
    }

    async fn fetch_status(&self, handle: &JobHandle) -> Result<PollSnapshot, GenerationClientError> {
        *self.poll_count.write().await += 1;

        let mut jobs = self.jobs.write().await;
        let Some(steps) = jobs.get_mut(handle.as_str()) else {
            return Err(GenerationClientError::InvalidResponse(format!(
                "unknown task {}",
                handle
            )));
        };

        // A single remaining snapshot repeats forever.
        if steps.len() == 1 {
            if let Some(Ok(snapshot)) = steps.front() {
                return Ok(snapshot.clone());
            }
        }

        match steps.pop_front() {
            Some(Ok(snapshot)) => Ok(snapshot),
            Some(Err(error)) => Err(error),
            None => Err(GenerationClientError::InvalidResponse(format!(
                "no scripted status left for task {}",
                handle
            ))),
        }
    }
}
