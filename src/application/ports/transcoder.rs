use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::CanonicalAudioSpec;

#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub target: CanonicalAudioSpec,
    pub metadata: Vec<(String, String)>,
}

/// Re-encodes an audio file into the requested target encoding, overwriting
/// any existing output.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(&self, request: &TranscodeRequest) -> Result<(), TranscodeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("failed to start transcoder: {0}")]
    Spawn(String),
    #[error("transcoder exited with status {status:?}: {stderr}")]
    Failed { status: Option<i32>, stderr: String },
    #[error("transcoder timed out after {0:?}")]
    Timeout(Duration),
}
