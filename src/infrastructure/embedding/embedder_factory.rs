use std::path::Path;
use std::sync::Arc;

use super::onnx_speaker_embedder::{OnnxSpeakerEmbedder, SpeakerModelOptions};
use crate::application::ports::{EmbedderError, SpeakerEmbedder};
use crate::presentation::config::EmbeddingSettings;

pub struct EmbedderFactory;

impl EmbedderFactory {
    /// Loads the speaker model once. A configured `model_path` takes
    /// precedence over the Hub repository.
    pub fn create(settings: &EmbeddingSettings) -> Result<Arc<dyn SpeakerEmbedder>, EmbedderError> {
        let options = SpeakerModelOptions {
            dimension: settings.dimension,
            intra_threads: settings.intra_threads,
        };

        let embedder = match settings.model_path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => OnnxSpeakerEmbedder::from_file(Path::new(path), &options)?,
            None => OnnxSpeakerEmbedder::from_hub(&settings.hf_repo, &settings.hf_file, &options)?,
        };

        Ok(Arc::new(embedder))
    }
}
