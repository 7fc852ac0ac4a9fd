//! Mock asset store for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::assets::{AssetStore, AssetStoreError, UploadRequest};

/// Mock implementation of the AssetStore trait.
///
/// Records uploads and answers with a configurable URL. An injected error
/// fails only the next upload.
#[derive(Debug)]
pub struct MockAssetStore {
    url: Arc<RwLock<String>>,
    uploads: Arc<RwLock<Vec<UploadRequest>>>,
    next_error: Arc<RwLock<Option<AssetStoreError>>>,
}

impl Default for MockAssetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAssetStore {
    /// Create a new mock store.
    pub fn new() -> Self {
        Self {
            url: Arc::new(RwLock::new("https://cdn.mock/logo.png".to_string())),
            uploads: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the URL returned by subsequent uploads.
    pub async fn set_url(&self, url: impl Into<String>) {
        *self.url.write().await = url.into();
    }

    /// Configure the next upload to fail with the given error.
    pub async fn set_next_error(&self, error: AssetStoreError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all recorded uploads.
    pub async fn recorded_uploads(&self) -> Vec<UploadRequest> {
        self.uploads.read().await.clone()
    }
}

#[async_trait]
impl AssetStore for MockAssetStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn upload_image(&self, request: &UploadRequest) -> Result<String, AssetStoreError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        self.uploads.write().await.push(request.clone());
        Ok(self.url.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_uploads() {
        let store = MockAssetStore::new();
        store.set_url("https://cdn.mock/custom.png").await;

        let url = store
            .upload_image(&UploadRequest::new(vec![1, 2], "logo.png"))
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.mock/custom.png");

        let uploads = store.recorded_uploads().await;
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].file_name, "logo.png");
    }

    #[tokio::test]
    async fn test_error_injection_consumed() {
        let store = MockAssetStore::new();
        store
            .set_next_error(AssetStoreError::UploadRejected("bad".into()))
            .await;

        let result = store
            .upload_image(&UploadRequest::new(vec![], "logo.png"))
            .await;
        assert!(result.is_err());

        let result = store
            .upload_image(&UploadRequest::new(vec![], "logo.png"))
            .await;
        assert!(result.is_ok());
    }
}
