use std::ffi::OsStr;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;

pub(crate) enum ProcessFailure {
    Spawn(std::io::Error),
    TimedOut,
}

/// Runs `binary` to completion with captured output. The child is killed
/// when the deadline passes.
pub(crate) async fn run_with_deadline<I, S>(
    binary: &Path,
    args: I,
    deadline: Duration,
) -> Result<Output, ProcessFailure>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(binary);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match tokio::time::timeout(deadline, command.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(ProcessFailure::Spawn(e)),
        Err(_) => Err(ProcessFailure::TimedOut),
    }
}

pub(crate) fn stderr_tail(output: &Output) -> String {
    const MAX_STDERR: usize = 2048;

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.len() <= MAX_STDERR {
        return stderr.to_string();
    }
    let mut start = stderr.len() - MAX_STDERR;
    while !stderr.is_char_boundary(start) {
        start += 1;
    }
    stderr[start..].to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum BinaryCheckError {
    #[error("{binary} could not be started: {reason}")]
    Unavailable { binary: String, reason: String },
    #[error("{binary} -version exited with status {status:?}")]
    Failed { binary: String, status: Option<i32> },
}

/// Runs `<binary> -version` and returns the first line of its output.
pub async fn check_binary(binary: &Path) -> Result<String, BinaryCheckError> {
    let name = binary.display().to_string();
    let output = run_with_deadline(binary, ["-version"], Duration::from_secs(10))
        .await
        .map_err(|failure| BinaryCheckError::Unavailable {
            binary: name.clone(),
            reason: match failure {
                ProcessFailure::Spawn(e) => e.to_string(),
                ProcessFailure::TimedOut => "timed out".to_string(),
            },
        })?;

    if !output.status.success() {
        return Err(BinaryCheckError::Failed {
            binary: name,
            status: output.status.code(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
}
