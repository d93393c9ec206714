use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{ObjectStorage, StorageError};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::gcs_storage::GcsObjectStorage;
use super::local_storage::LocalObjectStorage;

pub struct ObjectStorageFactory;

impl ObjectStorageFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn ObjectStorage>, StorageError> {
        match settings.provider {
            StorageProviderSetting::Local => {
                let path = PathBuf::from(&settings.local_path);
                let base_url = settings
                    .public_base_url
                    .as_deref()
                    .unwrap_or("http://localhost:3000/files");
                let store = LocalObjectStorage::new(path, base_url)?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Gcs => {
                let bucket = settings.bucket.as_deref().ok_or_else(|| {
                    StorageError::Configuration("storage.bucket required for gcs".into())
                })?;
                let store =
                    GcsObjectStorage::new(bucket, settings.service_account_path.as_deref())?;
                Ok(Arc::new(store))
            }
        }
    }
}
