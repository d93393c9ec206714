mod media_prober;
mod object_storage;
mod speaker_embedder;
mod transcoder;

pub use media_prober::{AudioProbe, MediaProber, ProbeError};
pub use object_storage::{ObjectStorage, StorageError};
pub use speaker_embedder::{EmbedderError, SpeakerEmbedder};
pub use transcoder::{TranscodeError, TranscodeRequest, Transcoder};
