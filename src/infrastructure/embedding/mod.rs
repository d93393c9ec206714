mod embedder_factory;
pub mod fbank;
mod onnx_speaker_embedder;

pub use embedder_factory::EmbedderFactory;
pub use onnx_speaker_embedder::{OnnxSpeakerEmbedder, SpeakerModelOptions};
