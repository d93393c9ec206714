use std::path::Path;
use std::sync::Arc;

use object_store::gcp::{GoogleCloudStorage, GoogleCloudStorageBuilder};
use serde::Serialize;

use crate::application::ports::{ObjectStorage, StorageError};
use crate::domain::{ObjectKey, PublicUrl};

use super::transfer::{download_to_file, encode_key_path, upload_from_file};

const GCS_JSON_API_BASE: &str = "https://storage.googleapis.com/storage/v1";
const GCS_PUBLIC_BASE: &str = "https://storage.googleapis.com";

/// Google Cloud Storage bucket (the bucket behind Firebase Storage).
///
/// Object transfer goes through `object_store`; granting public read uses the
/// JSON API object ACL endpoint with the client's own bearer credential.
pub struct GcsObjectStorage {
    inner: Arc<GoogleCloudStorage>,
    bucket: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct ObjectAccessControl<'a> {
    entity: &'a str,
    role: &'a str,
}

impl GcsObjectStorage {
    pub fn new(bucket: &str, service_account_path: Option<&str>) -> Result<Self, StorageError> {
        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket);
        if let Some(path) = service_account_path {
            builder = builder.with_service_account_path(path);
        }
        let store = builder
            .build()
            .map_err(|e| StorageError::Configuration(e.to_string()))?;

        tracing::info!(bucket = bucket, "Google Cloud Storage client initialized");

        Ok(Self {
            inner: Arc::new(store),
            bucket: bucket.to_string(),
            http: reqwest::Client::new(),
        })
    }

    pub fn public_url(&self, key: &ObjectKey) -> PublicUrl {
        PublicUrl::new(format!(
            "{}/{}/{}",
            GCS_PUBLIC_BASE,
            self.bucket,
            encode_key_path(key)
        ))
    }
}

#[async_trait::async_trait]
impl ObjectStorage for GcsObjectStorage {
    async fn download_to(&self, key: &ObjectKey, destination: &Path) -> Result<u64, StorageError> {
        download_to_file(self.inner.as_ref(), key, destination).await
    }

    async fn upload_from(&self, source: &Path, key: &ObjectKey) -> Result<u64, StorageError> {
        upload_from_file(self.inner.as_ref(), source, key).await
    }

    async fn make_public(&self, key: &ObjectKey) -> Result<PublicUrl, StorageError> {
        let credential = self
            .inner
            .credentials()
            .get_credential()
            .await
            .map_err(|e| StorageError::PublishFailed(format!("credential: {}", e)))?;

        let url = format!(
            "{}/b/{}/o/{}/acl",
            GCS_JSON_API_BASE,
            urlencoding::encode(&self.bucket),
            urlencoding::encode(key.as_str())
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&credential.bearer)
            .json(&ObjectAccessControl {
                entity: "allUsers",
                role: "READER",
            })
            .send()
            .await
            .map_err(|e| StorageError::PublishFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(key.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::PublishFailed(format!(
                "acl insert returned {}: {}",
                status, body
            )));
        }

        Ok(self.public_url(key))
    }
}

