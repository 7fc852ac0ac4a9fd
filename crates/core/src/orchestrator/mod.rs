//! Generation orchestrator for batched image jobs.
//!
//! The orchestrator drives every job through the same lifecycle:
//! - **Submit**: hand the prompt to the remote service, which may answer
//!   with a task handle or with the finished result inline
//! - **Poll**: check status on a fixed interval until the job ends or the
//!   attempt budget runs out, flagging jobs whose progress never moves
//! - **Recover**: resubmit a stuck first attempt exactly once
//!
//! Batches run concurrently and every job settles before aggregation.

mod aggregate;
mod config;
mod poller;
mod runner;
mod types;

pub use aggregate::aggregate;
pub use config::{FailureMode, OrchestratorConfig};
pub use poller::{PollSession, SessionEnd, StatusPoller};
pub use runner::GenerationOrchestrator;
pub use types::{AggregateResult, BatchError, JobError, JobOutcome};
