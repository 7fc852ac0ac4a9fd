//! Types for reference-asset upload operations.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur uploading an asset.
#[derive(Debug, Error)]
pub enum AssetStoreError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// An image to upload, as received from the client.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub bytes: Vec<u8>,
    /// Original file name; only its extension is used.
    pub file_name: String,
}

impl UploadRequest {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
        }
    }

    /// Lowercased extension of the original file name, defaulting to png.
    pub fn extension(&self) -> String {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| "png".to_string())
    }

    /// MIME type derived from the extension.
    pub fn mime_type(&self) -> String {
        let ext = self.extension();
        let subtype = if ext == "jpg" { "jpeg".to_string() } else { ext };
        format!("image/{}", subtype)
    }
}

/// Remote storage for reference images (logos).
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Upload one image and return its public URL.
    async fn upload_image(&self, request: &UploadRequest) -> Result<String, AssetStoreError>;
}
