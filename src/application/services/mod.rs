mod audio_normalizer;
mod scratch_space;
mod verification_error;
mod verification_service;

pub use audio_normalizer::{
    AudioNormalizer, DEFAULT_SOFTWARE_TAG, NormalizeError, NormalizedAudio, metadata_tags,
};
pub use scratch_space::{ScratchFile, ScratchSpace, release_file};
pub use verification_error::{ErrorKind, VerificationError};
pub use verification_service::VerificationService;
