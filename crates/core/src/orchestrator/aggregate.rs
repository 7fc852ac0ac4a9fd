//! Batch result aggregation.

use tracing::warn;

use super::config::FailureMode;
use super::types::{AggregateResult, BatchError, JobOutcome};

/// Fold settled job outcomes into the batch result.
///
/// Outcomes are placed by slot, so arrival order never affects the output
/// shape. In strict mode the failing job with the lowest slot fails the
/// batch; in tolerant mode only a batch with zero successes is an error.
pub fn aggregate(
    outcomes: Vec<JobOutcome>,
    mode: FailureMode,
) -> Result<AggregateResult, BatchError> {
    let n = outcomes.len();
    let mut by_slot: Vec<Option<JobOutcome>> = Vec::with_capacity(n);
    by_slot.resize_with(n, || None);

    for outcome in outcomes {
        let slot = outcome.slot;
        if slot >= n {
            warn!("Ignoring job outcome with slot {} in a batch of {}", slot, n);
            continue;
        }
        if by_slot[slot].is_some() {
            warn!("Duplicate job outcome for slot {}", slot);
        }
        by_slot[slot] = Some(outcome);
    }

    if mode == FailureMode::Strict {
        for outcome in by_slot.iter().flatten() {
            if !outcome.success {
                return Err(BatchError::JobFailed {
                    slot: outcome.slot,
                    label: outcome.label.clone(),
                    reason: outcome
                        .error
                        .clone()
                        .unwrap_or_else(|| "unknown".to_string()),
                });
            }
        }
    }

    let mut results: Vec<Option<String>> = vec![None; n];
    let mut errors: Vec<Option<String>> = vec![None; n];
    let mut success_count = 0;

    for (slot, outcome) in by_slot.into_iter().enumerate() {
        let Some(outcome) = outcome else { continue };
        if outcome.success {
            success_count += 1;
            results[slot] = outcome.result;
        } else {
            errors[slot] = Some(outcome.error.unwrap_or_else(|| "unknown".to_string()));
        }
    }

    if success_count == 0 {
        let reasons = errors.iter().flatten().cloned().collect();
        return Err(BatchError::AllJobsFailed { reasons });
    }

    Ok(AggregateResult {
        success: success_count > 0,
        results,
        errors,
        success_count,
    })
}
