use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;

use super::process::{ProcessFailure, run_with_deadline, stderr_tail};
use crate::application::ports::{AudioProbe, MediaProber, ProbeError};

const SHOW_ENTRIES: &str = "stream=channels,sample_rate,codec_name,bits_per_sample:format=duration";

pub struct FfprobeProber {
    binary: PathBuf,
    timeout: Duration,
}

impl FfprobeProber {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    fn build_args(path: &Path) -> Vec<OsString> {
        vec![
            "-v".into(),
            "error".into(),
            "-select_streams".into(),
            "a:0".into(),
            "-show_entries".into(),
            SHOW_ENTRIES.into(),
            "-of".into(),
            "default=noprint_wrappers=1".into(),
            path.as_os_str().to_os_string(),
        ]
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    async fn probe(&self, path: &Path) -> Result<AudioProbe, ProbeError> {
        let output = run_with_deadline(&self.binary, Self::build_args(path), self.timeout)
            .await
            .map_err(|failure| match failure {
                ProcessFailure::Spawn(e) => {
                    ProbeError::Spawn(format!("{}: {}", self.binary.display(), e))
                }
                ProcessFailure::TimedOut => ProbeError::Timeout(self.timeout),
            })?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                status: output.status.code(),
                stderr: stderr_tail(&output),
            });
        }

        let probe = parse_probe_output(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!(?probe, "ffprobe result");
        Ok(probe)
    }
}

/// Parses `key=value` lines as printed by `-of default=noprint_wrappers=1`.
///
/// The first occurrence of a key wins, `N/A` and unparsable values are
/// treated as absent, and unknown keys are ignored.
pub fn parse_probe_output(stdout: &str) -> AudioProbe {
    let mut probe = AudioProbe::default();

    for line in stdout.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() || value == "N/A" {
            continue;
        }

        match key.trim() {
            "channels" => set_once(&mut probe.channels, value),
            "sample_rate" => set_once(&mut probe.sample_rate, value),
            "bits_per_sample" => set_once(&mut probe.bits_per_sample, value),
            "duration" => set_once(&mut probe.duration_secs, value),
            "codec_name" => {
                if probe.codec_name.is_none() {
                    probe.codec_name = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    probe
}

fn set_once<T: FromStr>(slot: &mut Option<T>, value: &str) {
    if slot.is_none() {
        *slot = value.parse().ok();
    }
}
