//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Jobs (submissions, outcomes, durations)
//! - Polling (ticks, transient errors, stuck retries)
//! - Batches (outcome per request)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Job Metrics
// =============================================================================

/// Generation submissions total (stuck retries submit again).
pub static JOBS_SUBMITTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "wrapforge_jobs_submitted_total",
        "Total generation job submissions",
    )
    .unwrap()
});

/// Jobs that produced a result.
pub static JOBS_SUCCEEDED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "wrapforge_jobs_succeeded_total",
        "Total generation jobs that produced a result",
    )
    .unwrap()
});

/// Jobs that ended without a result, by final error kind.
pub static JOBS_FAILED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "wrapforge_jobs_failed_total",
            "Total generation jobs that failed",
        ),
        &["reason"], // "submission", "remote", "stuck", "exhausted"
    )
    .unwrap()
});

/// Job duration in seconds, submission to final outcome.
pub static JOB_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "wrapforge_job_duration_seconds",
            "Duration of generation jobs including retries",
        )
        .buckets(vec![5.0, 15.0, 30.0, 60.0, 120.0, 240.0, 480.0]),
        &["result"], // "success", "failure"
    )
    .unwrap()
});

// =============================================================================
// Polling Metrics
// =============================================================================

/// Status checks performed total.
pub static POLL_TICKS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("wrapforge_poll_ticks_total", "Total status checks performed").unwrap()
});

/// Status checks that failed at the transport or HTTP level.
pub static TRANSIENT_POLL_ERRORS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "wrapforge_transient_poll_errors_total",
        "Total status checks that failed without ending the session",
    )
    .unwrap()
});

/// Stuck jobs resubmitted.
pub static STUCK_RETRIES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "wrapforge_stuck_retries_total",
        "Total jobs resubmitted after a stuck first attempt",
    )
    .unwrap()
});

// =============================================================================
// Batch Metrics
// =============================================================================

/// Batches total by outcome.
pub static BATCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("wrapforge_batches_total", "Total generation batches"),
        &["result"], // "success", "partial", "failed"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Jobs
        Box::new(JOBS_SUBMITTED.clone()),
        Box::new(JOBS_SUCCEEDED.clone()),
        Box::new(JOBS_FAILED.clone()),
        Box::new(JOB_DURATION.clone()),
        // Polling
        Box::new(POLL_TICKS.clone()),
        Box::new(TRANSIENT_POLL_ERRORS.clone()),
        Box::new(STUCK_RETRIES.clone()),
        // Batches
        Box::new(BATCHES.clone()),
    ]
}
