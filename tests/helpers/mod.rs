#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use voxgate::application::ports::{
    AudioProbe, EmbedderError, MediaProber, ObjectStorage, ProbeError, SpeakerEmbedder,
    StorageError, TranscodeError, TranscodeRequest, Transcoder,
};
use voxgate::application::services::{AudioNormalizer, ScratchSpace, VerificationService};
use voxgate::domain::{
    AudioFormatTag, CanonicalAudioSpec, EmbeddingVector, LocalAudioFile, ObjectKey, PublicUrl,
};

pub const PUBLIC_BASE: &str = "https://public.test";

/// Object storage held in memory; objects are plain byte vectors.
#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    published: Mutex<Vec<String>>,
    pub download_delay: Option<Duration>,
    pub fail_uploads: bool,
}

impl InMemoryStorage {
    pub fn with_objects(objects: &[(&str, &[u8])]) -> Self {
        let storage = Self::default();
        for (key, bytes) in objects {
            storage.insert(key, bytes);
        }
        storage
    }

    pub fn insert(&self, key: &str, bytes: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn download_to(&self, key: &ObjectKey, destination: &Path) -> Result<u64, StorageError> {
        if let Some(delay) = self.download_delay {
            tokio::time::sleep(delay).await;
        }
        let bytes = self
            .object(key.as_str())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        tokio::fs::write(destination, &bytes).await?;
        Ok(bytes.len() as u64)
    }

    async fn upload_from(&self, source: &Path, key: &ObjectKey) -> Result<u64, StorageError> {
        if self.fail_uploads {
            return Err(StorageError::UploadFailed("bucket unavailable".to_string()));
        }
        let bytes = tokio::fs::read(source).await?;
        let size = bytes.len() as u64;
        self.insert(key.as_str(), &bytes);
        Ok(size)
    }

    async fn make_public(&self, key: &ObjectKey) -> Result<PublicUrl, StorageError> {
        if self.object(key.as_str()).is_none() {
            return Err(StorageError::NotFound(key.to_string()));
        }
        self.published.lock().unwrap().push(key.to_string());
        Ok(PublicUrl::new(format!("{}/{}", PUBLIC_BASE, key)))
    }
}

pub fn write_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for sample in samples {
        writer.write_sample(*sample).unwrap();
    }
    writer.finalize().unwrap();
}

pub fn sine_wave(frequency: f32, sample_rate: u32, len: usize) -> Vec<i16> {
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            ((2.0 * std::f32::consts::PI * frequency * t).sin() * 12_000.0) as i16
        })
        .collect()
}

/// Writes a short mono WAV to the requested output, 16 kHz unless
/// `output_sample_rate` says otherwise.
#[derive(Default)]
pub struct FakeTranscoder {
    requests: Mutex<Vec<TranscodeRequest>>,
    pub fail: bool,
    pub output_sample_rate: Option<u32>,
}

impl FakeTranscoder {
    pub fn emitting(sample_rate: u32) -> Self {
        Self {
            output_sample_rate: Some(sample_rate),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<TranscodeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn transcode(&self, request: &TranscodeRequest) -> Result<(), TranscodeError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(TranscodeError::Failed {
                status: Some(1),
                stderr: "Invalid data found when processing input".to_string(),
            });
        }
        let rate = self.output_sample_rate.unwrap_or(16_000);
        write_wav(
            &request.output,
            rate,
            1,
            &sine_wave(440.0, rate, rate as usize / 10),
        );
        Ok(())
    }
}

pub struct FakeProber {
    pub probe: AudioProbe,
}

impl FakeProber {
    pub fn canonical() -> Self {
        let spec = CanonicalAudioSpec::REQUIRED;
        Self {
            probe: AudioProbe {
                channels: Some(spec.channels),
                sample_rate: Some(spec.sample_rate),
                codec_name: Some(spec.codec_name.to_string()),
                bits_per_sample: Some(spec.bits_per_sample),
                duration_secs: Some(0.1),
            },
        }
    }

    pub fn stereo() -> Self {
        let mut prober = Self::canonical();
        prober.probe.channels = Some(2);
        prober
    }
}

#[async_trait]
impl MediaProber for FakeProber {
    async fn probe(&self, path: &Path) -> Result<AudioProbe, ProbeError> {
        if !path.exists() {
            return Err(ProbeError::Failed {
                status: Some(1),
                stderr: "No such file or directory".to_string(),
            });
        }
        Ok(self.probe.clone())
    }
}

/// Reports what the WAV header of the probed file actually says.
pub struct WavHeaderProber;

#[async_trait]
impl MediaProber for WavHeaderProber {
    async fn probe(&self, path: &Path) -> Result<AudioProbe, ProbeError> {
        let reader = hound::WavReader::open(path).map_err(|e| ProbeError::Failed {
            status: Some(1),
            stderr: e.to_string(),
        })?;
        let spec = reader.spec();
        let codec = match (spec.sample_format, spec.bits_per_sample) {
            (hound::SampleFormat::Int, 16) => "pcm_s16le",
            (hound::SampleFormat::Int, 24) => "pcm_s24le",
            (hound::SampleFormat::Float, 32) => "pcm_f32le",
            _ => "unknown",
        };
        Ok(AudioProbe {
            channels: Some(spec.channels),
            sample_rate: Some(spec.sample_rate),
            codec_name: Some(codec.to_string()),
            bits_per_sample: Some(spec.bits_per_sample),
            duration_secs: Some(reader.duration() as f64 / spec.sample_rate as f64),
        })
    }
}

/// Maps exact file contents to a fixed vector. Unknown content is treated
/// as unreadable audio.
#[derive(Default)]
pub struct FakeEmbedder {
    vectors: HashMap<Vec<u8>, Vec<f32>>,
    seen_formats: Mutex<Vec<AudioFormatTag>>,
}

impl FakeEmbedder {
    pub fn with_vectors(entries: &[(&[u8], Vec<f32>)]) -> Self {
        Self {
            vectors: entries
                .iter()
                .map(|(bytes, vector)| (bytes.to_vec(), vector.clone()))
                .collect(),
            seen_formats: Mutex::new(Vec::new()),
        }
    }

    pub fn seen_formats(&self) -> Vec<AudioFormatTag> {
        self.seen_formats.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeakerEmbedder for FakeEmbedder {
    async fn embed(&self, file: &LocalAudioFile) -> Result<EmbeddingVector, EmbedderError> {
        self.seen_formats.lock().unwrap().push(file.format());
        let bytes = tokio::fs::read(file.path())
            .await
            .map_err(|e| EmbedderError::UnreadableAudio(e.to_string()))?;
        self.vectors
            .get(&bytes)
            .cloned()
            .map(EmbeddingVector::new)
            .ok_or_else(|| EmbedderError::UnreadableAudio("unrecognized audio".to_string()))
    }

    fn dimension(&self) -> usize {
        3
    }
}

pub struct Pipeline {
    pub scratch_dir: tempfile::TempDir,
    pub storage: Arc<InMemoryStorage>,
    pub embedder: Arc<FakeEmbedder>,
    pub transcoder: Arc<FakeTranscoder>,
    pub service: Arc<VerificationService>,
}

impl Pipeline {
    pub fn new(storage: InMemoryStorage, embedder: FakeEmbedder) -> Self {
        Self::build(
            storage,
            embedder,
            FakeTranscoder::default(),
            FakeProber::canonical(),
            Duration::from_secs(5),
        )
    }

    pub fn build(
        storage: InMemoryStorage,
        embedder: FakeEmbedder,
        transcoder: FakeTranscoder,
        prober: FakeProber,
        transfer_timeout: Duration,
    ) -> Self {
        let scratch_dir = tempfile::TempDir::new().unwrap();
        let storage = Arc::new(storage);
        let embedder = Arc::new(embedder);
        let transcoder = Arc::new(transcoder);

        let normalizer = AudioNormalizer::new(
            Arc::clone(&transcoder) as Arc<dyn Transcoder>,
            Arc::new(prober),
            "Lavf61.9.100",
        );
        let service = Arc::new(VerificationService::new(
            Arc::clone(&storage) as Arc<dyn ObjectStorage>,
            Arc::clone(&embedder) as Arc<dyn SpeakerEmbedder>,
            normalizer,
            ScratchSpace::new(scratch_dir.path()),
            transfer_timeout,
        ));

        Self {
            scratch_dir,
            storage,
            embedder,
            transcoder,
            service,
        }
    }

    pub fn leftover_files(&self) -> usize {
        std::fs::read_dir(self.scratch_dir.path()).unwrap().count()
    }
}
