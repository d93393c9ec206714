use std::fmt;

const MAX_IDENTITY_LENGTH: usize = 128;

/// Caller-supplied identity used to name and tag a published artifact.
///
/// The value ends up in an object key, a local file name and transcoder
/// metadata, so path separators, parent references and control characters
/// are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpeakerIdentity(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("identity is empty")]
    Empty,
    #[error("identity exceeds {MAX_IDENTITY_LENGTH} characters")]
    TooLong,
    #[error("identity contains a forbidden character: {0:?}")]
    ForbiddenCharacter(char),
    #[error("identity must not be a relative path component")]
    RelativeComponent,
}

impl SpeakerIdentity {
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(IdentityError::Empty);
        }
        if value.chars().count() > MAX_IDENTITY_LENGTH {
            return Err(IdentityError::TooLong);
        }
        if value == "." || value == ".." {
            return Err(IdentityError::RelativeComponent);
        }
        if let Some(c) = value
            .chars()
            .find(|c| matches!(c, '/' | '\\' | '\0') || c.is_control())
        {
            return Err(IdentityError::ForbiddenCharacter(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpeakerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
