use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::{ObjectKey, PublicUrl};

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Streams the object at `key` into `destination`, returning the byte count.
    async fn download_to(&self, key: &ObjectKey, destination: &Path) -> Result<u64, StorageError>;

    async fn upload_from(&self, source: &Path, key: &ObjectKey) -> Result<u64, StorageError>;

    /// Grants anonymous read access to `key` and returns its public URL.
    async fn make_public(&self, key: &ObjectKey) -> Result<PublicUrl, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("publish failed: {0}")]
    PublishFailed(String),
    #[error("storage configuration invalid: {0}")]
    Configuration(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
