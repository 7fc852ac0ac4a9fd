use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::orchestrator::OrchestratorConfig;

/// Root configuration
///
/// Every section has working defaults; an empty file yields a server that
/// runs in stub mode (no API key) on port 3000.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served at the web root (the mockup frontend).
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// Upper bound for multipart request bodies, logos included.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

/// Generation service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// KIE API key. When absent the server runs with stub backends.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Generation API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// File upload endpoint for reference images.
    #[serde(default = "default_upload_url")]
    pub upload_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Aspect ratio requested from the service.
    #[serde(default = "default_image_size")]
    pub image_size: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            upload_url: default_upload_url(),
            timeout_secs: default_timeout(),
            image_size: default_image_size(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.kie.ai/api/v1/gpt4o-image".to_string()
}

fn default_upload_url() -> String {
    "https://kieai.redpandaai.co/api/file-base64-upload".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_image_size() -> String {
    "1:1".to_string()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub generation: SanitizedGenerationConfig,
    pub orchestrator: OrchestratorConfig,
}

/// Sanitized generation config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedGenerationConfig {
    pub api_key_configured: bool,
    pub base_url: String,
    pub upload_url: String,
    pub timeout_secs: u32,
    pub image_size: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            generation: SanitizedGenerationConfig {
                api_key_configured: config
                    .generation
                    .api_key
                    .as_deref()
                    .map(|key| !key.trim().is_empty())
                    .unwrap_or(false),
                base_url: config.generation.base_url.clone(),
                upload_url: config.generation.upload_url.clone(),
                timeout_secs: config.generation.timeout_secs,
                image_size: config.generation.image_size.clone(),
            },
            orchestrator: config.orchestrator.clone(),
        }
    }
}
