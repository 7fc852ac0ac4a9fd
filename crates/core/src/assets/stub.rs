//! Stub asset store for running without credentials.

use async_trait::async_trait;
use tracing::info;

use super::{AssetStore, AssetStoreError, UploadRequest};

const PLACEHOLDER_URL: &str = "https://placehold.co/256x256/000000/d4af37?text=logo";

/// Asset store that uploads nothing and answers with a fixed placeholder.
pub struct StubAssetStore;

#[async_trait]
impl AssetStore for StubAssetStore {
    fn name(&self) -> &str {
        "stub"
    }

    async fn upload_image(&self, request: &UploadRequest) -> Result<String, AssetStoreError> {
        info!(
            "Stub upload of {} ({} bytes)",
            request.file_name,
            request.bytes.len()
        );
        Ok(PLACEHOLDER_URL.to_string())
    }
}
