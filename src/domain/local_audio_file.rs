use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormatTag {
    /// As downloaded; encoding unknown.
    Raw,
    /// Produced by the normalizer and verified against the canonical spec.
    Canonical,
}

impl AudioFormatTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Canonical => "canonical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAudioFile {
    path: PathBuf,
    format: AudioFormatTag,
}

impl LocalAudioFile {
    pub fn new(path: impl Into<PathBuf>, format: AudioFormatTag) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> AudioFormatTag {
        self.format
    }

    pub fn with_format(&self, format: AudioFormatTag) -> Self {
        Self {
            path: self.path.clone(),
            format,
        }
    }
}
