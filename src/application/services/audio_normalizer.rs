use std::sync::Arc;

use crate::application::ports::{
    AudioProbe, MediaProber, ProbeError, TranscodeError, TranscodeRequest, Transcoder,
};
use crate::domain::{AudioFormatTag, CanonicalAudioSpec, LocalAudioFile, SpeakerIdentity};

pub const DEFAULT_SOFTWARE_TAG: &str = "Lavf61.9.100";

/// Transcodes audio into [`CanonicalAudioSpec::REQUIRED`] and then verifies
/// the result with an independent probe. A clean transcoder exit is never
/// trusted on its own.
pub struct AudioNormalizer {
    transcoder: Arc<dyn Transcoder>,
    prober: Arc<dyn MediaProber>,
    software_tag: String,
}

impl AudioNormalizer {
    pub fn new(
        transcoder: Arc<dyn Transcoder>,
        prober: Arc<dyn MediaProber>,
        software_tag: impl Into<String>,
    ) -> Self {
        Self {
            transcoder,
            prober,
            software_tag: software_tag.into(),
        }
    }

    pub async fn normalize(
        &self,
        input: &LocalAudioFile,
        output: &LocalAudioFile,
        identity: &SpeakerIdentity,
    ) -> Result<NormalizedAudio, NormalizeError> {
        let target = CanonicalAudioSpec::REQUIRED;
        let request = TranscodeRequest {
            input: input.path().to_path_buf(),
            output: output.path().to_path_buf(),
            target,
            metadata: metadata_tags(&self.software_tag, identity),
        };

        tracing::debug!(
            input = %input.path().display(),
            output = %output.path().display(),
            target = %target,
            "Transcoding audio"
        );

        self.transcoder
            .transcode(&request)
            .await
            .map_err(NormalizeError::Transcode)?;

        let probe = self
            .prober
            .probe(output.path())
            .await
            .map_err(NormalizeError::Probe)?;

        let deviations = probe.deviations(&target);
        if !deviations.is_empty() {
            tracing::warn!(
                deviations = ?deviations,
                output = %output.path().display(),
                "Transcoder output failed verification"
            );
            return Err(NormalizeError::SpecMismatch { deviations });
        }

        tracing::debug!(
            duration_secs = ?probe.duration_secs,
            "Normalized audio verified"
        );

        Ok(NormalizedAudio {
            file: output.with_format(AudioFormatTag::Canonical),
            probe,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedAudio {
    pub file: LocalAudioFile,
    pub probe: AudioProbe,
}

pub fn metadata_tags(software_tag: &str, identity: &SpeakerIdentity) -> Vec<(String, String)> {
    vec![
        ("Software".to_string(), software_tag.to_string()),
        ("artist".to_string(), identity.as_str().to_string()),
        ("title".to_string(), format!("Processed by {}", identity)),
    ]
}

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("transcode: {0}")]
    Transcode(TranscodeError),
    #[error("probe: {0}")]
    Probe(ProbeError),
    #[error("output does not match canonical spec: {}", deviations.join("; "))]
    SpecMismatch { deviations: Vec<String> },
}
