use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{ObjectStorage, SpeakerEmbedder, StorageError};
use crate::domain::{
    AudioFormatTag, EmbeddingVector, ObjectKey, PublicUrl, RemoteAudioRef, SimilarityResult,
    SpeakerIdentity, similarity,
};

use super::audio_normalizer::AudioNormalizer;
use super::scratch_space::{ScratchFile, ScratchSpace, release_all};
use super::verification_error::VerificationError;

/// Runs the two public pipelines: comparing two remote recordings and
/// publishing a normalized copy of one. Scratch files are released on every
/// exit path; no step is retried.
pub struct VerificationService {
    storage: Arc<dyn ObjectStorage>,
    embedder: Arc<dyn SpeakerEmbedder>,
    normalizer: AudioNormalizer,
    scratch: ScratchSpace,
    transfer_timeout: Duration,
}

impl VerificationService {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        embedder: Arc<dyn SpeakerEmbedder>,
        normalizer: AudioNormalizer,
        scratch: ScratchSpace,
        transfer_timeout: Duration,
    ) -> Self {
        Self {
            storage,
            embedder,
            normalizer,
            scratch,
            transfer_timeout,
        }
    }

    pub fn scratch(&self) -> &ScratchSpace {
        &self.scratch
    }

    #[tracing::instrument(skip_all)]
    pub async fn compare_remote(
        &self,
        first_locator: &str,
        second_locator: &str,
    ) -> Result<SimilarityResult, VerificationError> {
        let first = RemoteAudioRef::parse(first_locator)?;
        let second = RemoteAudioRef::parse(second_locator)?;

        tracing::debug!(
            first_key = %first.object_key(),
            second_key = %second.object_key(),
            "Comparing remote audio"
        );

        let first_file = self.scratch.allocate("temp1", ".wav", AudioFormatTag::Raw);
        let second_file = self.scratch.allocate("temp2", ".wav", AudioFormatTag::Raw);

        let result = self
            .run_comparison(&first, &second, &first_file, &second_file)
            .await;

        release_all([first_file, second_file]).await;

        if let Ok(outcome) = &result {
            tracing::info!(
                similarity = outcome.similarity,
                distance = outcome.distance,
                "Audio comparison completed"
            );
        }

        result
    }

    async fn run_comparison(
        &self,
        first: &RemoteAudioRef,
        second: &RemoteAudioRef,
        first_file: &ScratchFile,
        second_file: &ScratchFile,
    ) -> Result<SimilarityResult, VerificationError> {
        self.download(first.object_key(), first_file).await?;
        self.download(second.object_key(), second_file).await?;

        let first_embedding = self.embed(first_file).await?;
        let second_embedding = self.embed(second_file).await?;

        Ok(similarity::score(&first_embedding, &second_embedding)?)
    }

    #[tracing::instrument(skip_all)]
    pub async fn publish_normalized(
        &self,
        locator: &str,
        identity: &str,
    ) -> Result<PublicUrl, VerificationError> {
        let reference = RemoteAudioRef::parse(locator)?;
        let identity = SpeakerIdentity::parse(identity)?;

        tracing::debug!(
            key = %reference.object_key(),
            identity = %identity,
            "Publishing normalized audio"
        );

        let original = self
            .scratch
            .allocate("original", ".wav", AudioFormatTag::Raw);
        let processed = self.scratch.allocate_for_identity(
            "processed",
            &identity,
            ".wav",
            AudioFormatTag::Canonical,
        );

        let result = self
            .run_publication(&reference, &identity, &original, &processed)
            .await;

        release_all([original, processed]).await;

        if let Ok(url) = &result {
            tracing::info!(identity = %identity, public_url = %url, "Normalized audio published");
        }

        result
    }

    async fn run_publication(
        &self,
        reference: &RemoteAudioRef,
        identity: &SpeakerIdentity,
        original: &ScratchFile,
        processed: &ScratchFile,
    ) -> Result<PublicUrl, VerificationError> {
        self.download(reference.object_key(), original).await?;

        let normalized = self
            .normalizer
            .normalize(original.audio(), processed.audio(), identity)
            .await?;

        let destination = ObjectKey::published(identity);

        self.with_timeout(
            "upload",
            self.storage.upload_from(normalized.file.path(), &destination),
        )
        .await?
        .map_err(|source| VerificationError::UploadFailed {
            key: destination.clone(),
            source,
        })?;

        let url = self
            .with_timeout("publish", self.storage.make_public(&destination))
            .await?
            .map_err(|source| VerificationError::UploadFailed {
                key: destination.clone(),
                source,
            })?;

        Ok(url)
    }

    async fn download(
        &self,
        key: &ObjectKey,
        destination: &ScratchFile,
    ) -> Result<u64, VerificationError> {
        let bytes = self
            .with_timeout(
                "download",
                self.storage.download_to(key, destination.path()),
            )
            .await?
            .map_err(|source| VerificationError::DownloadFailed {
                key: key.clone(),
                source,
            })?;

        tracing::debug!(key = %key, bytes, "Audio downloaded to scratch");
        Ok(bytes)
    }

    async fn embed(&self, file: &ScratchFile) -> Result<EmbeddingVector, VerificationError> {
        let embedding = self
            .embedder
            .embed(file.audio())
            .await
            .map_err(VerificationError::ModelInferenceError)?;

        tracing::debug!(
            dimensions = embedding.dimensions(),
            format = file.audio().format().as_str(),
            "Speaker embedding extracted"
        );
        Ok(embedding)
    }

    async fn with_timeout<T>(
        &self,
        stage: &'static str,
        operation: impl Future<Output = Result<T, StorageError>>,
    ) -> Result<Result<T, StorageError>, VerificationError> {
        tokio::time::timeout(self.transfer_timeout, operation)
            .await
            .map_err(|_| VerificationError::Timeout {
                stage,
                after: self.transfer_timeout,
            })
    }
}
