//! Remote generation service abstraction.
//!
//! This module provides a `GenerationClient` trait for submitting render
//! jobs and polling their status, with a KIE HTTP implementation and a stub
//! backend for running without credentials.

mod kie;
mod stub;
mod types;

pub use kie::KieClient;
pub use stub::StubGenerationClient;
pub use types::*;
