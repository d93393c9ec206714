use std::fmt;

use super::speaker_identity::SpeakerIdentity;

const PUBLISHED_AUDIO_PREFIX: &str = "processed_audio";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Builds a key from raw input, dropping surrounding path separators.
    pub fn from_raw(key: impl AsRef<str>) -> Self {
        Self(key.as_ref().trim_matches('/').to_string())
    }

    pub fn published(identity: &SpeakerIdentity) -> Self {
        Self(format!(
            "{}/{}/{}.wav",
            PUBLISHED_AUDIO_PREFIX,
            identity.as_str(),
            identity.as_str()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUrl(String);

impl PublicUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PublicUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
