use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use super::process::{ProcessFailure, run_with_deadline, stderr_tail};
use crate::application::ports::{TranscodeError, TranscodeRequest, Transcoder};

pub struct FfmpegTranscoder {
    binary: PathBuf,
    timeout: Duration,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// Argument list for one transcode. Metadata tags are written as
    /// `-metadata key=value` pairs and the output is always overwritten.
    pub fn build_args(request: &TranscodeRequest) -> Vec<OsString> {
        let target = &request.target;
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-nostdin".into(),
            "-v".into(),
            "error".into(),
            "-i".into(),
            request.input.clone().into_os_string(),
            "-vn".into(),
            "-ac".into(),
            target.channels.to_string().into(),
            "-ar".into(),
            target.sample_rate.to_string().into(),
            "-c:a".into(),
            target.codec_name.into(),
        ];

        for (key, value) in &request.metadata {
            args.push("-metadata".into());
            args.push(format!("{key}={value}").into());
        }

        args.push("-f".into());
        args.push("wav".into());
        args.push("-y".into());
        args.push(request.output.clone().into_os_string());
        args
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    #[tracing::instrument(skip(self, request), fields(input = %request.input.display()))]
    async fn transcode(&self, request: &TranscodeRequest) -> Result<(), TranscodeError> {
        let args = Self::build_args(request);

        let output = run_with_deadline(&self.binary, &args, self.timeout)
            .await
            .map_err(|failure| match failure {
                ProcessFailure::Spawn(e) => {
                    TranscodeError::Spawn(format!("{}: {}", self.binary.display(), e))
                }
                ProcessFailure::TimedOut => TranscodeError::Timeout(self.timeout),
            })?;

        if !output.status.success() {
            let stderr = stderr_tail(&output);
            tracing::warn!(status = ?output.status.code(), stderr = %stderr, "ffmpeg failed");
            return Err(TranscodeError::Failed {
                status: output.status.code(),
                stderr,
            });
        }

        Ok(())
    }
}
