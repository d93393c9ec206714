use std::path::Path;

use futures::StreamExt;
use object_store::path::Path as StorePath;
use object_store::{MultipartUpload, ObjectStore, PutPayload};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::application::ports::StorageError;
use crate::domain::ObjectKey;

const UPLOAD_PART_SIZE: usize = 8 * 1024 * 1024;

pub(super) async fn download_to_file(
    store: &dyn ObjectStore,
    key: &ObjectKey,
    destination: &Path,
) -> Result<u64, StorageError> {
    let store_path = StorePath::from(key.as_str());
    let result = store.get(&store_path).await.map_err(|e| match e {
        object_store::Error::NotFound { .. } => StorageError::NotFound(key.to_string()),
        other => StorageError::DownloadFailed(other.to_string()),
    })?;

    let mut file = tokio::fs::File::create(destination).await?;
    let mut stream = result.into_stream();
    let mut total_bytes: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(|e| StorageError::DownloadFailed(e.to_string()))?;
        total_bytes += bytes.len() as u64;
        file.write_all(&bytes).await?;
    }

    file.flush().await?;

    Ok(total_bytes)
}

pub(super) async fn upload_from_file(
    store: &dyn ObjectStore,
    source: &Path,
    key: &ObjectKey,
) -> Result<u64, StorageError> {
    let file = tokio::fs::File::open(source).await?;
    let store_path = StorePath::from(key.as_str());
    let upload = store
        .put_multipart(&store_path)
        .await
        .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

    GuardedUpload::new(upload).send_file(file).await
}

/// Multipart upload that is aborted unless it completes.
///
/// Dropping the guard early (an error, a timeout or a cancelled request)
/// schedules `abort` on the current runtime so no orphaned parts are left
/// in the bucket.
#[derive(Debug)]
pub struct GuardedUpload {
    upload: Option<Box<dyn MultipartUpload>>,
}

impl GuardedUpload {
    pub fn new(upload: Box<dyn MultipartUpload>) -> Self {
        Self {
            upload: Some(upload),
        }
    }

    /// Streams `file` in parts and completes the upload. Returns the number
    /// of bytes sent.
    pub async fn send_file(mut self, mut file: tokio::fs::File) -> Result<u64, StorageError> {
        let mut total_bytes: u64 = 0;

        loop {
            let part = read_part(&mut file).await?;
            if part.is_empty() {
                break;
            }
            total_bytes += part.len() as u64;
            let upload = self
                .upload
                .as_mut()
                .ok_or_else(|| StorageError::UploadFailed("upload already finished".to_string()))?;
            upload
                .put_part(PutPayload::from(part))
                .await
                .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        }

        if let Some(mut upload) = self.upload.take() {
            if let Err(e) = upload.complete().await {
                let _ = upload.abort().await;
                return Err(StorageError::UploadFailed(e.to_string()));
            }
        }

        Ok(total_bytes)
    }
}

impl Drop for GuardedUpload {
    fn drop(&mut self) {
        let Some(mut upload) = self.upload.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = upload.abort().await {
                        tracing::warn!(error = %e, "Failed to abort unfinished multipart upload");
                    } else {
                        tracing::debug!("Unfinished multipart upload aborted");
                    }
                });
            }
            Err(_) => {
                tracing::warn!("Multipart upload dropped outside a runtime; parts may remain");
            }
        }
    }
}

async fn read_part(file: &mut tokio::fs::File) -> std::io::Result<Vec<u8>> {
    let mut part = Vec::with_capacity(UPLOAD_PART_SIZE);
    let mut buf = vec![0u8; 64 * 1024];
    while part.len() < UPLOAD_PART_SIZE {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        part.extend_from_slice(&buf[..n]);
    }
    Ok(part)
}

pub(super) async fn ensure_exists(store: &dyn ObjectStore, key: &ObjectKey) -> Result<(), StorageError> {
    let store_path = StorePath::from(key.as_str());
    store.head(&store_path).await.map_err(|e| match e {
        object_store::Error::NotFound { .. } => StorageError::NotFound(key.to_string()),
        other => StorageError::PublishFailed(other.to_string()),
    })?;
    Ok(())
}

/// Percent-encodes each path segment of `key`, keeping the separators.
pub(super) fn encode_key_path(key: &ObjectKey) -> String {
    key.as_str()
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
