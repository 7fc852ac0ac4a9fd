pub mod assets;
pub mod config;
pub mod generation;
pub mod metrics;
pub mod orchestrator;
pub mod prompt;
pub mod testing;

pub use assets::{AssetStore, KieAssetStore, StubAssetStore};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, SanitizedConfig,
};
pub use generation::{GenerationClient, KieClient, StubGenerationClient};
pub use orchestrator::{FailureMode, GenerationOrchestrator, OrchestratorConfig};
