use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::CanonicalAudioSpec;

/// Stream and container properties reported for an audio file.
/// Fields the prober could not determine are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioProbe {
    pub channels: Option<u16>,
    pub sample_rate: Option<u32>,
    pub codec_name: Option<String>,
    pub bits_per_sample: Option<u16>,
    pub duration_secs: Option<f64>,
}

impl AudioProbe {
    /// Lists every field that does not match `spec`. Empty means conforming.
    /// Duration is informational and never compared.
    pub fn deviations(&self, spec: &CanonicalAudioSpec) -> Vec<String> {
        let mut deviations = Vec::new();

        if self.channels != Some(spec.channels) {
            deviations.push(format!(
                "channels: expected {}, got {}",
                spec.channels,
                display_field(&self.channels)
            ));
        }
        if self.sample_rate != Some(spec.sample_rate) {
            deviations.push(format!(
                "sample_rate: expected {}, got {}",
                spec.sample_rate,
                display_field(&self.sample_rate)
            ));
        }
        if self.codec_name.as_deref() != Some(spec.codec_name) {
            deviations.push(format!(
                "codec_name: expected {}, got {}",
                spec.codec_name,
                display_field(&self.codec_name)
            ));
        }
        if self.bits_per_sample != Some(spec.bits_per_sample) {
            deviations.push(format!(
                "bits_per_sample: expected {}, got {}",
                spec.bits_per_sample,
                display_field(&self.bits_per_sample)
            ));
        }

        deviations
    }

    pub fn conforms_to(&self, spec: &CanonicalAudioSpec) -> bool {
        self.deviations(spec).is_empty()
    }
}

fn display_field<T: std::fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "missing".to_string())
}

#[async_trait]
pub trait MediaProber: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<AudioProbe, ProbeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to start prober: {0}")]
    Spawn(String),
    #[error("prober exited with status {status:?}: {stderr}")]
    Failed { status: Option<i32>, stderr: String },
    #[error("prober timed out after {0:?}")]
    Timeout(Duration),
}
