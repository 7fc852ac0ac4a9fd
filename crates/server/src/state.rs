use std::sync::Arc;
use wrapforge_core::assets::AssetStore;
use wrapforge_core::orchestrator::GenerationOrchestrator;
use wrapforge_core::{Config, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    orchestrator: Arc<GenerationOrchestrator>,
    assets: Arc<dyn AssetStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        orchestrator: Arc<GenerationOrchestrator>,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        Self {
            config,
            orchestrator,
            assets,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn orchestrator(&self) -> &GenerationOrchestrator {
        self.orchestrator.as_ref()
    }

    pub fn assets(&self) -> &dyn AssetStore {
        self.assets.as_ref()
    }
}
