use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use ndarray::Array3;
use ort::inputs;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::TensorRef;

use super::fbank::{FbankConfig, FbankExtractor, Features};
use crate::application::ports::{EmbedderError, SpeakerEmbedder};
use crate::domain::{EmbeddingVector, LocalAudioFile};
use crate::infrastructure::audio::audio_decoder::decode_file_to_mono_16k;

#[derive(Debug, Clone)]
pub struct SpeakerModelOptions {
    pub dimension: usize,
    pub intra_threads: usize,
}

/// Speaker embedder backed by an ONNX export of a wespeaker-style network
/// taking `[1, frames, 80]` filterbank features.
pub struct OnnxSpeakerEmbedder {
    session: Arc<Mutex<Session>>,
    fbank: Arc<FbankExtractor>,
    dimension: usize,
}

impl OnnxSpeakerEmbedder {
    pub fn from_file(path: &Path, options: &SpeakerModelOptions) -> Result<Self, EmbedderError> {
        tracing::info!(
            model = %path.display(),
            dimension = options.dimension,
            intra_threads = options.intra_threads,
            "Loading ONNX speaker embedding model"
        );

        let session = build_session(path, options.intra_threads.max(1))
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("{}: {}", path.display(), e)))?;

        for input in &session.inputs {
            tracing::debug!(name = %input.name, input_type = ?input.input_type, "Model input");
        }

        tracing::info!("Speaker embedding model loaded successfully");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            fbank: Arc::new(FbankExtractor::new(FbankConfig::default())),
            dimension: options.dimension,
        })
    }

    /// Downloads (or reuses the cached copy of) `filename` from a Hugging
    /// Face model repository, then loads it.
    pub fn from_hub(
        repo_id: &str,
        filename: &str,
        options: &SpeakerModelOptions,
    ) -> Result<Self, EmbedderError> {
        let path = fetch_from_hub(repo_id, filename)?;
        Self::from_file(&path, options)
    }

    fn extract(
        session: &Mutex<Session>,
        fbank: &FbankExtractor,
        path: &Path,
    ) -> Result<Vec<f32>, EmbedderError> {
        let samples = decode_file_to_mono_16k(path)?;
        let mut features = fbank
            .compute(&samples)
            .ok_or(EmbedderError::AudioTooShort(samples.len()))?;
        features.subtract_mean();

        tracing::debug!(
            frames = features.frames,
            bins = features.bins,
            "Computed filterbank features"
        );

        run_model(session, features)
    }
}

fn build_session(path: &Path, intra_threads: usize) -> ort::Result<Session> {
    Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(intra_threads)?
        .commit_from_file(path)
}

fn fetch_from_hub(repo_id: &str, filename: &str) -> Result<PathBuf, EmbedderError> {
    tracing::info!(repo = repo_id, file = filename, "Fetching speaker model from Hugging Face Hub");

    let api = Api::new().map_err(|e| EmbedderError::ModelLoadFailed(e.to_string()))?;
    api.repo(Repo::new(repo_id.to_string(), RepoType::Model))
        .get(filename)
        .map_err(|e| EmbedderError::ModelLoadFailed(format!("{}: {}", filename, e)))
}

fn run_model(session: &Mutex<Session>, features: Features) -> Result<Vec<f32>, EmbedderError> {
    let input = Array3::from_shape_vec((1, features.frames, features.bins), features.data)
        .map_err(|e| EmbedderError::InferenceFailed(format!("feature shape: {}", e)))?
        .into_dyn();

    let mut session = session
        .lock()
        .map_err(|_| EmbedderError::InferenceFailed("model session lock poisoned".to_string()))?;

    let tensor = TensorRef::from_array_view(input.view())
        .map_err(|e| EmbedderError::InferenceFailed(e.to_string()))?;
    let outputs = session
        .run(inputs![tensor])
        .map_err(|e| EmbedderError::InferenceFailed(e.to_string()))?;

    let output = outputs
        .values()
        .next()
        .ok_or_else(|| EmbedderError::InferenceFailed("model produced no outputs".to_string()))?;
    let embedding = output
        .try_extract_array::<f32>()
        .map_err(|e| EmbedderError::InferenceFailed(e.to_string()))?;

    Ok(embedding.iter().copied().collect())
}

#[async_trait]
impl SpeakerEmbedder for OnnxSpeakerEmbedder {
    #[tracing::instrument(skip(self, file), fields(path = %file.path().display(), format = file.format().as_str()))]
    async fn embed(&self, file: &LocalAudioFile) -> Result<EmbeddingVector, EmbedderError> {
        let session = Arc::clone(&self.session);
        let fbank = Arc::clone(&self.fbank);
        let path = file.path().to_path_buf();

        let values = tokio::task::spawn_blocking(move || Self::extract(&session, &fbank, &path))
            .await
            .map_err(|e| EmbedderError::InferenceFailed(format!("embedding task: {}", e)))??;

        if values.len() != self.dimension {
            return Err(EmbedderError::InferenceFailed(format!(
                "model returned {} values, expected {}",
                values.len(),
                self.dimension
            )));
        }

        Ok(EmbeddingVector::new(values))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
