//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of the external service traits,
//! allowing the whole generation lifecycle to be tested without real
//! infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use wrapforge_core::testing::{MockAssetStore, MockGenerationClient, ScriptedJob};
//!
//! let client = MockGenerationClient::new();
//! let assets = MockAssetStore::new();
//!
//! // Script each submission's behavior
//! client
//!     .script(ScriptedJob::accepted().then(PollSnapshot::succeeded(vec![url])))
//!     .await;
//!
//! // Use in an orchestrator or AppState...
//! ```

mod mock_asset_store;
mod mock_generation_client;

pub use mock_asset_store::MockAssetStore;
pub use mock_generation_client::{MockGenerationClient, ScriptedJob};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::generation::JobSpec;
    use crate::prompt::{build_prompt, CoverageStyle, DesignBrief};

    /// Create a test design brief with reasonable defaults.
    pub fn design_brief() -> DesignBrief {
        DesignBrief {
            vehicle_type: "Renault Trafic".to_string(),
            vehicle_category: Some("utility van".to_string()),
            industry: Some("plumbing".to_string()),
            brand_name: Some("Aqua Pro".to_string()),
            main_text: Some("Fast and reliable".to_string()),
            key_info: Some("01 23 45 67 89".to_string()),
            style: Some("modern".to_string()),
            primary_colors: "blue and white".to_string(),
            constraints: None,
            logo_provided: false,
        }
    }

    /// Create a test job spec for one coverage style with a full prompt.
    pub fn job_spec(slot: usize, style: CoverageStyle) -> JobSpec {
        JobSpec::new(
            slot,
            style.as_str(),
            build_prompt(&design_brief(), style, None),
        )
    }
}
