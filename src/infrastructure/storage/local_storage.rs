use std::path::{Path, PathBuf};
use std::sync::Arc;

use object_store::local::LocalFileSystem;

use crate::application::ports::{ObjectStorage, StorageError};
use crate::domain::{ObjectKey, PublicUrl};

use super::transfer::{download_to_file, encode_key_path, ensure_exists, upload_from_file};

/// Filesystem-backed storage for local development and tests. Every object is
/// considered public; its URL is `public_base_url` joined with the key.
pub struct LocalObjectStorage {
    inner: Arc<LocalFileSystem>,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(base_path: PathBuf, public_base_url: &str) -> Result<Self, StorageError> {
        std::fs::create_dir_all(&base_path).map_err(StorageError::Io)?;
        let fs = LocalFileSystem::new_with_prefix(base_path)
            .map_err(|e| StorageError::Configuration(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn download_to(&self, key: &ObjectKey, destination: &Path) -> Result<u64, StorageError> {
        download_to_file(self.inner.as_ref(), key, destination).await
    }

    async fn upload_from(&self, source: &Path, key: &ObjectKey) -> Result<u64, StorageError> {
        upload_from_file(self.inner.as_ref(), source, key).await
    }

    async fn make_public(&self, key: &ObjectKey) -> Result<PublicUrl, StorageError> {
        ensure_exists(self.inner.as_ref(), key).await?;
        Ok(PublicUrl::new(format!(
            "{}/{}",
            self.public_base_url,
            encode_key_path(key)
        )))
    }
}
