use std::fmt;
use std::time::Duration;

use crate::application::ports::{EmbedderError, ProbeError, StorageError, TranscodeError};
use crate::domain::{CanonicalAudioSpec, IdentityError, LocatorError, ObjectKey, ScoreError};

use super::audio_normalizer::NormalizeError;

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("invalid audio reference: {0}")]
    InvalidReference(#[from] LocatorError),
    #[error("invalid identity: {0}")]
    InvalidIdentity(#[from] IdentityError),
    #[error("download of '{key}' failed: {source}")]
    DownloadFailed { key: ObjectKey, source: StorageError },
    #[error("transcode failed: {0}")]
    TranscodeFailed(TranscodeError),
    #[error("normalized audio does not match {expected}: {}", deviations.join("; "))]
    SpecMismatch {
        expected: CanonicalAudioSpec,
        deviations: Vec<String>,
    },
    #[error("model inference failed: {0}")]
    ModelInferenceError(EmbedderError),
    #[error("embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
    #[error("degenerate embedding: {0}")]
    DegenerateEmbedding(&'static str),
    #[error("upload of '{key}' failed: {source}")]
    UploadFailed { key: ObjectKey, source: StorageError },
    #[error("{stage} timed out after {after:?}")]
    Timeout { stage: &'static str, after: Duration },
}

/// Stable label for logs and metrics; the message text is for humans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidReference,
    InvalidIdentity,
    DownloadFailed,
    TranscodeFailed,
    SpecMismatch,
    ModelInferenceError,
    DimensionMismatch,
    DegenerateEmbedding,
    UploadFailed,
    Timeout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidReference => "invalid_reference",
            Self::InvalidIdentity => "invalid_identity",
            Self::DownloadFailed => "download_failed",
            Self::TranscodeFailed => "transcode_failed",
            Self::SpecMismatch => "spec_mismatch",
            Self::ModelInferenceError => "model_inference_error",
            Self::DimensionMismatch => "dimension_mismatch",
            Self::DegenerateEmbedding => "degenerate_embedding",
            Self::UploadFailed => "upload_failed",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl VerificationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidReference(_) => ErrorKind::InvalidReference,
            Self::InvalidIdentity(_) => ErrorKind::InvalidIdentity,
            Self::DownloadFailed { .. } => ErrorKind::DownloadFailed,
            Self::TranscodeFailed(_) => ErrorKind::TranscodeFailed,
            Self::SpecMismatch { .. } => ErrorKind::SpecMismatch,
            Self::ModelInferenceError(_) => ErrorKind::ModelInferenceError,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::DegenerateEmbedding(_) => ErrorKind::DegenerateEmbedding,
            Self::UploadFailed { .. } => ErrorKind::UploadFailed,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    pub fn is_missing_object(&self) -> bool {
        matches!(
            self,
            Self::DownloadFailed {
                source: StorageError::NotFound(_),
                ..
            }
        )
    }
}

impl From<NormalizeError> for VerificationError {
    fn from(error: NormalizeError) -> Self {
        let expected = CanonicalAudioSpec::REQUIRED;
        match error {
            NormalizeError::Transcode(TranscodeError::Timeout(after)) => Self::Timeout {
                stage: "transcode",
                after,
            },
            NormalizeError::Transcode(e) => Self::TranscodeFailed(e),
            NormalizeError::Probe(ProbeError::Timeout(after)) => Self::Timeout {
                stage: "probe",
                after,
            },
            NormalizeError::Probe(e) => Self::SpecMismatch {
                expected,
                deviations: vec![format!("output could not be probed: {}", e)],
            },
            NormalizeError::SpecMismatch { deviations } => Self::SpecMismatch {
                expected,
                deviations,
            },
        }
    }
}

impl From<ScoreError> for VerificationError {
    fn from(error: ScoreError) -> Self {
        match error {
            ScoreError::DimensionMismatch { left, right } => {
                Self::DimensionMismatch { left, right }
            }
            ScoreError::DegenerateEmbedding(reason) => Self::DegenerateEmbedding(reason),
        }
    }
}
