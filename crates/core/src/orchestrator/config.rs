//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the generation orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// How long to wait between status checks (milliseconds).
    /// The first check happens one interval after submission.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Total status checks before a job is given up as exhausted.
    /// Together with the interval this bounds how long a job can run.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// Consecutive zero-progress checks before a job counts as stuck.
    /// A stuck first attempt is resubmitted once.
    #[serde(default = "default_stuck_threshold")]
    pub stuck_threshold: u32,

    /// How a batch reacts to individual job failures.
    #[serde(default)]
    pub failure_mode: FailureMode,
}

/// Batch failure policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Deliver partial results; the batch fails only when every job failed.
    Tolerant,
    /// Any job failure fails the whole batch.
    Strict,
}

impl Default for FailureMode {
    fn default() -> Self {
        FailureMode::Tolerant
    }
}

fn default_poll_interval() -> u64 {
    5000 // 5 seconds
}

fn default_max_poll_attempts() -> u32 {
    40 // ~200 seconds at the default interval
}

fn default_stuck_threshold() -> u32 {
    15 // ~75 seconds of flat zero progress
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            max_poll_attempts: default_max_poll_attempts(),
            stuck_threshold: default_stuck_threshold(),
            failure_mode: FailureMode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.poll_interval_ms, 5000);
        assert_eq!(config.max_poll_attempts, 40);
        assert_eq!(config.stuck_threshold, 15);
        assert_eq!(config.failure_mode, FailureMode::Tolerant);
    }

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            poll_interval_ms = 1000
        "#;
        let config: OrchestratorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(config.max_poll_attempts, 40);
        assert_eq!(config.stuck_threshold, 15);
        assert_eq!(config.failure_mode, FailureMode::Tolerant);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            poll_interval_ms = 2000
            max_poll_attempts = 60
            stuck_threshold = 10
            failure_mode = "strict"
        "#;
        let config: OrchestratorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.poll_interval_ms, 2000);
        assert_eq!(config.max_poll_attempts, 60);
        assert_eq!(config.stuck_threshold, 10);
        assert_eq!(config.failure_mode, FailureMode::Strict);
    }
}
