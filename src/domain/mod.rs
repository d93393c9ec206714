mod canonical_audio_spec;
mod embedding;
mod local_audio_file;
mod object_key;
mod remote_audio_ref;
pub mod similarity;
mod speaker_identity;

pub use canonical_audio_spec::CanonicalAudioSpec;
pub use embedding::EmbeddingVector;
pub use local_audio_file::{AudioFormatTag, LocalAudioFile};
pub use object_key::{ObjectKey, PublicUrl};
pub use remote_audio_ref::{LocatorError, MANAGED_STORAGE_ENDPOINT, RemoteAudioRef};
pub use similarity::{ScoreError, SimilarityResult};
pub use speaker_identity::{IdentityError, SpeakerIdentity};
