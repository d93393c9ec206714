use async_trait::async_trait;

use crate::domain::{EmbeddingVector, LocalAudioFile};

/// Turns one whole audio file into a fixed-dimension speaker embedding.
///
/// Implementations are loaded once and shared across requests, so `embed`
/// must be safe to call concurrently.
#[async_trait]
pub trait SpeakerEmbedder: Send + Sync {
    async fn embed(&self, file: &LocalAudioFile) -> Result<EmbeddingVector, EmbedderError>;

    fn dimension(&self) -> usize;
}

#[derive(Debug, thiserror::Error)]
pub enum EmbedderError {
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("audio could not be read: {0}")]
    UnreadableAudio(String),
    #[error("audio is too short for embedding: {0} samples")]
    AudioTooShort(usize),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
}
