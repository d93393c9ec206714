use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::domain::{AudioFormatTag, LocalAudioFile, SpeakerIdentity};

/// Hands out uniquely named scratch files under a single root directory.
///
/// Allocation only reserves a name; nothing is created on disk until a
/// download or transcode writes to the path.
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    root: PathBuf,
}

impl ScratchSpace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn system() -> Self {
        Self::new(std::env::temp_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    pub fn allocate(&self, prefix: &str, suffix: &str, format: AudioFormatTag) -> ScratchFile {
        let name = format!("{}_{}{}", prefix, Uuid::new_v4(), suffix);
        ScratchFile::new(LocalAudioFile::new(self.root.join(name), format))
    }

    /// Same as [`allocate`](Self::allocate) but embeds the identity in the
    /// file name so the artifact is recognizable while it exists.
    pub fn allocate_for_identity(
        &self,
        prefix: &str,
        identity: &SpeakerIdentity,
        suffix: &str,
        format: AudioFormatTag,
    ) -> ScratchFile {
        let name = format!(
            "{}_{}_{}{}",
            prefix,
            Uuid::new_v4().simple(),
            identity.as_str(),
            suffix
        );
        ScratchFile::new(LocalAudioFile::new(self.root.join(name), format))
    }
}

/// Owns one scratch file for the duration of a request.
///
/// The file is deleted by [`release`](Self::release) or, failing that, when
/// the guard is dropped (error return, panic or cancelled future).
#[derive(Debug)]
pub struct ScratchFile {
    file: LocalAudioFile,
    released: bool,
}

impl ScratchFile {
    fn new(file: LocalAudioFile) -> Self {
        Self {
            file,
            released: false,
        }
    }

    pub fn audio(&self) -> &LocalAudioFile {
        &self.file
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Deletes the file now. On failure the guard stays armed and retries
    /// when dropped.
    pub async fn release(&mut self) -> io::Result<()> {
        release_file(&self.file).await?;
        self.released = true;
        Ok(())
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_file(self.file.path()) {
            Ok(()) => {
                tracing::debug!(path = %self.file.path().display(), "Scratch file removed on drop");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %self.file.path().display(),
                    "Failed to remove scratch file on drop"
                );
            }
        }
    }
}

/// Deletes `file` if it exists. Deleting a missing file succeeds.
pub async fn release_file(file: &LocalAudioFile) -> io::Result<()> {
    match tokio::fs::remove_file(file.path()).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

pub(crate) async fn release_all(files: impl IntoIterator<Item = ScratchFile>) {
    for mut file in files {
        let path = file.path().to_path_buf();
        if let Err(e) = file.release().await {
            tracing::warn!(
                error = %e,
                path = %path.display(),
                "Failed to release scratch file"
            );
        }
    }
}
