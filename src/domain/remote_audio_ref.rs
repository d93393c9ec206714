use super::object_key::ObjectKey;

pub const MANAGED_STORAGE_ENDPOINT: &str = "https://firebasestorage.googleapis.com";

const OBJECT_MARKER: &str = "/o/";

/// A pointer to an audio object in managed storage, as received from a client.
///
/// Accepts either a managed-storage download URL
/// (`https://firebasestorage.googleapis.com/v0/b/<bucket>/o/<encoded key>?alt=media&token=...`)
/// or a bare object key. Resolution is a pure string transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAudioRef {
    locator: String,
    key: ObjectKey,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    #[error("audio locator is empty")]
    Empty,
    #[error("storage url has no object marker '/o/'")]
    MissingObjectMarker,
    #[error("object path is not valid utf-8 after decoding: {0}")]
    InvalidEncoding(String),
    #[error("audio locator resolves to an empty object key")]
    EmptyKey,
}

impl RemoteAudioRef {
    pub fn parse(locator: &str) -> Result<Self, LocatorError> {
        let locator = locator.trim();
        if locator.is_empty() {
            return Err(LocatorError::Empty);
        }

        let key = if locator.starts_with(MANAGED_STORAGE_ENDPOINT) {
            resolve_endpoint_url(locator)?
        } else {
            ObjectKey::from_raw(locator)
        };

        if key.is_empty() {
            return Err(LocatorError::EmptyKey);
        }

        Ok(Self {
            locator: locator.to_string(),
            key,
        })
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn object_key(&self) -> &ObjectKey {
        &self.key
    }

    pub fn into_object_key(self) -> ObjectKey {
        self.key
    }
}

fn resolve_endpoint_url(url: &str) -> Result<ObjectKey, LocatorError> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let path = without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment);

    let (_, encoded) = path
        .split_once(OBJECT_MARKER)
        .ok_or(LocatorError::MissingObjectMarker)?;

    let decoded = urlencoding::decode(encoded)
        .map_err(|e| LocatorError::InvalidEncoding(e.to_string()))?;

    Ok(ObjectKey::from_raw(decoded.as_ref()))
}
