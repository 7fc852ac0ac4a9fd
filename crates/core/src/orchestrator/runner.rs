//! Generation orchestrator implementation.
//!
//! Drives each job through its lifecycle (submit, poll, at most one stuck
//! resubmission) and runs whole batches concurrently. Every job in a batch
//! settles before aggregation; one job's failure never cancels the others.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;

use crate::generation::{GenerationClient, JobSpec, SubmitOutcome};
use crate::metrics;

use super::aggregate::aggregate;
use super::config::OrchestratorConfig;
use super::poller::StatusPoller;
use super::types::{AggregateResult, BatchError, JobError, JobOutcome};

/// Runs generation jobs against a remote service.
pub struct GenerationOrchestrator {
    client: Arc<dyn GenerationClient>,
    config: OrchestratorConfig,
}

impl GenerationOrchestrator {
    pub fn new(client: Arc<dyn GenerationClient>, config: OrchestratorConfig) -> Self {
        Self { client, config }
    }

    /// Orchestration limits currently in force.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// One submit-and-wait pass for a job.
    async fn run_attempt(&self, spec: &JobSpec) -> Result<Vec<String>, JobError> {
        metrics::JOBS_SUBMITTED.inc();
        let outcome = self
            .client
            .submit(spec)
            .await
            .map_err(JobError::Submission)?;

        match outcome {
            SubmitOutcome::Completed(urls) => {
                info!(
                    "Job '{}' completed inline with {} result(s)",
                    spec.label,
                    urls.len()
                );
                Ok(urls)
            }
            SubmitOutcome::Accepted(handle) => {
                info!("Job '{}' accepted as task {}", spec.label, handle);
                let poller = StatusPoller::new(Arc::clone(&self.client), &self.config);
                poller.poll(&handle, &spec.label).await
            }
        }
    }

    /// Run one job to its final outcome.
    ///
    /// A first attempt that ends stuck is resubmitted once under a fresh
    /// handle; any other ending, including a second stuck, is final. Never
    /// errors: every failure becomes a failed outcome.
    pub async fn run_job(&self, spec: &JobSpec) -> JobOutcome {
        let started = Instant::now();
        let mut attempt: u32 = 1;

        let outcome = loop {
            match self.run_attempt(spec).await {
                Ok(urls) => match urls.into_iter().next() {
                    Some(url) => break JobOutcome::succeeded(spec.slot, &spec.label, url),
                    None => {
                        break JobOutcome::failed(
                            spec.slot,
                            &spec.label,
                            "service reported success but returned no images",
                        )
                    }
                },
                Err(e) if e.is_stuck() && attempt == 1 => {
                    warn!("Job '{}' stuck ({}), resubmitting once", spec.label, e);
                    metrics::STUCK_RETRIES.inc();
                    attempt = 2;
                }
                Err(e) => {
                    warn!("Job '{}' failed on attempt {}: {}", spec.label, attempt, e);
                    metrics::JOBS_FAILED.with_label_values(&[e.kind()]).inc();
                    break JobOutcome::failed(spec.slot, &spec.label, e.to_string());
                }
            }
        };

        let elapsed = started.elapsed().as_secs_f64();
        if outcome.success {
            metrics::JOBS_SUCCEEDED.inc();
            metrics::JOB_DURATION
                .with_label_values(&["success"])
                .observe(elapsed);
        } else {
            metrics::JOB_DURATION
                .with_label_values(&["failure"])
                .observe(elapsed);
        }
        outcome
    }

    /// Run a batch of jobs concurrently and aggregate the outcomes.
    ///
    /// All jobs run to completion regardless of siblings. The result arrays
    /// are indexed by slot, not by completion order.
    pub async fn run_all(&self, specs: &[JobSpec]) -> Result<AggregateResult, BatchError> {
        let batch_id = Uuid::new_v4();
        info!(
            "Batch {}: running {} generation job(s)",
            batch_id,
            specs.len()
        );

        let outcomes =
            futures::future::join_all(specs.iter().map(|spec| self.run_job(spec))).await;

        let success_count = outcomes.iter().filter(|o| o.success).count();
        info!(
            "Batch {}: {}/{} job(s) succeeded",
            batch_id,
            success_count,
            outcomes.len()
        );

        let result = aggregate(outcomes, self.config.failure_mode);
        match &result {
            Ok(r) if r.success_count == specs.len() => {
                metrics::BATCHES.with_label_values(&["success"]).inc();
            }
            Ok(_) => metrics::BATCHES.with_label_values(&["partial"]).inc(),
            Err(_) => metrics::BATCHES.with_label_values(&["failed"]).inc(),
        }
        result
    }
}
