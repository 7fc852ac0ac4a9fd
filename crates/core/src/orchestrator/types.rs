//! Types for the generation orchestrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generation::GenerationClientError;

/// Why a single job ended without a result.
///
/// Every variant is final except `Stuck` on the first attempt, which is
/// answered by exactly one resubmission.
#[derive(Debug, Error)]
pub enum JobError {
    /// The service rejected or never accepted the submission.
    #[error("submission failed: {0}")]
    Submission(GenerationClientError),

    /// The service explicitly reported the job as failed.
    #[error("generation failed: {0}")]
    Remote(String),

    /// Progress sat at zero for the whole stuck threshold.
    #[error("no progress after {zero_polls} consecutive status checks")]
    Stuck { zero_polls: u32 },

    /// The poll attempt budget ran out without a terminal answer.
    #[error("no result after {attempts} status checks")]
    Exhausted { attempts: u32 },
}

impl JobError {
    /// True for the one retryable ending.
    pub fn is_stuck(&self) -> bool {
        matches!(self, JobError::Stuck { .. })
    }

    /// Short classification used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::Submission(_) => "submission",
            JobError::Remote(_) => "remote",
            JobError::Stuck { .. } => "stuck",
            JobError::Exhausted { .. } => "exhausted",
        }
    }
}

/// The only error that leaves a batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Tolerant mode: not a single job produced a result.
    #[error("all {} generation jobs failed: {}", .reasons.len(), .reasons.join("; "))]
    AllJobsFailed { reasons: Vec<String> },

    /// Strict mode: any failure fails the batch. Carries the failing job
    /// with the lowest slot.
    #[error("generation '{label}' (slot {slot}) failed: {reason}")]
    JobFailed {
        slot: usize,
        label: String,
        reason: String,
    },
}

/// Final immutable record of one job's lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutcome {
    /// Position in the batch, assigned at submission.
    pub slot: usize,
    /// Human-readable label, carried into logs and errors.
    pub label: String,
    pub success: bool,
    pub result: Option<String>,
    pub error: Option<String>,
}

impl JobOutcome {
    pub fn succeeded(slot: usize, label: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            slot,
            label: label.into(),
            success: true,
            result: Some(result.into()),
            error: None,
        }
    }

    pub fn failed(slot: usize, label: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            slot,
            label: label.into(),
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Batch result handed back to the caller.
///
/// `results[i]` and `errors[i]` belong to the job submitted at slot `i`,
/// regardless of completion order. `success` is true exactly when
/// `success_count >= 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResult {
    pub success: bool,
    pub results: Vec<Option<String>>,
    pub errors: Vec<Option<String>>,
    pub success_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_error_kind() {
        assert_eq!(
            JobError::Submission(GenerationClientError::Timeout("timed out".into())).kind(),
            "submission"
        );
        assert_eq!(JobError::Remote("flagged".into()).kind(), "remote");
        assert_eq!(JobError::Stuck { zero_polls: 15 }.kind(), "stuck");
        assert_eq!(JobError::Exhausted { attempts: 40 }.kind(), "exhausted");
    }

    #[test]
    fn test_job_error_is_stuck() {
        assert!(JobError::Stuck { zero_polls: 15 }.is_stuck());
        assert!(!JobError::Remote("nope".into()).is_stuck());
        assert!(!JobError::Exhausted { attempts: 40 }.is_stuck());
    }

    #[test]
    fn test_job_error_display() {
        let err = JobError::Stuck { zero_polls: 15 };
        assert_eq!(
            err.to_string(),
            "no progress after 15 consecutive status checks"
        );

        let err = JobError::Exhausted { attempts: 40 };
        assert_eq!(err.to_string(), "no result after 40 status checks");
    }

    #[test]
    fn test_batch_error_all_failed_display() {
        let err = BatchError::AllJobsFailed {
            reasons: vec!["timed out".to_string(), "flagged".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "all 2 generation jobs failed: timed out; flagged"
        );
    }

    #[test]
    fn test_batch_error_job_failed_display() {
        let err = BatchError::JobFailed {
            slot: 1,
            label: "Semi-cover".to_string(),
            reason: "generation failed: flagged".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "generation 'Semi-cover' (slot 1) failed: generation failed: flagged"
        );
    }

    #[test]
    fn test_outcome_constructors() {
        let ok = JobOutcome::succeeded(0, "Standard", "https://img.example/1.png");
        assert!(ok.success);
        assert_eq!(ok.result.as_deref(), Some("https://img.example/1.png"));
        assert!(ok.error.is_none());

        let failed = JobOutcome::failed(2, "Full cover", "generation failed: flagged");
        assert!(!failed.success);
        assert!(failed.result.is_none());
        assert_eq!(failed.error.as_deref(), Some("generation failed: flagged"));
    }

    #[test]
    fn test_aggregate_result_serializes_nulls() {
        let aggregate = AggregateResult {
            success: true,
            results: vec![Some("https://img.example/1.png".to_string()), None],
            errors: vec![None, Some("generation failed: flagged".to_string())],
            success_count: 1,
        };

        let json = serde_json::to_value(&aggregate).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["results"][0], "https://img.example/1.png");
        assert!(json["results"][1].is_null());
        assert!(json["errors"][0].is_null());
        assert_eq!(json["errors"][1], "generation failed: flagged");
        assert_eq!(json["success_count"], 1);
    }
}
