use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, File, FileFormat, Map};
use serde::Deserialize;

use super::Environment;
use crate::application::services::DEFAULT_SOFTWARE_TAG;

const ENV_PREFIX: &str = "APP";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub audio: AudioSettings,
    pub embedding: EmbeddingSettings,
    pub timeouts: TimeoutSettings,
    pub verification: VerificationSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    #[default]
    Local,
    Gcs,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub bucket: Option<String>,
    pub service_account_path: Option<String>,
    pub local_path: String,
    pub public_base_url: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageProviderSetting::Local,
            bucket: None,
            service_account_path: None,
            local_path: "./storage".to_string(),
            public_base_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub software_tag: String,
    /// Defaults to the system temp directory.
    pub scratch_dir: Option<String>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            software_tag: DEFAULT_SOFTWARE_TAG.to_string(),
            scratch_dir: None,
        }
    }
}

impl AudioSettings {
    pub fn scratch_root(&self) -> PathBuf {
        match self.scratch_dir.as_deref().filter(|d| !d.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => std::env::temp_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Local ONNX file; when unset the model is fetched from `hf_repo`.
    pub model_path: Option<String>,
    pub hf_repo: String,
    pub hf_file: String,
    pub dimension: usize,
    pub intra_threads: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model_path: None,
            hf_repo: "Wespeaker/wespeaker-voxceleb-resnet34-LM".to_string(),
            hf_file: "voxceleb_resnet34_LM.onnx".to_string(),
            dimension: 256,
            intra_threads: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    pub download_secs: u64,
    pub transcode_secs: u64,
    pub probe_secs: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            download_secs: 60,
            transcode_secs: 120,
            probe_secs: 30,
        }
    }
}

impl TimeoutSettings {
    pub fn download(&self) -> Duration {
        Duration::from_secs(self.download_secs)
    }

    pub fn transcode(&self) -> Duration {
        Duration::from_secs(self.transcode_secs)
    }

    pub fn probe(&self) -> Duration {
        Duration::from_secs(self.probe_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VerificationSettings {
    /// When set, responses carry a `match` flag. The core never applies it.
    pub match_threshold: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,voxgate=debug,tower_http=debug".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Loads `appsettings.{environment}.toml` from the working directory (if
    /// present), then `APP_`-prefixed process variables on top.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."), environment, None)
    }

    /// Same layering as [`Settings::load`] with an explicit config directory.
    /// `env_vars`, when given, replaces the process environment as the
    /// variable source.
    pub fn load_from(
        config_dir: &Path,
        environment: Environment,
        env_vars: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let file = config_dir.join(format!("appsettings.{}.toml", environment.as_str()));

        let settings: Settings = Config::builder()
            .add_source(File::from(file).format(FileFormat::Toml).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env_vars),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(threshold) = self.verification.match_threshold {
            if !(-1.0..=1.0).contains(&threshold) {
                return Err(ConfigError::Message(format!(
                    "verification.match_threshold must be within [-1, 1], got {}",
                    threshold
                )));
            }
        }
        if self.storage.provider == StorageProviderSetting::Gcs
            && self.storage.bucket.as_deref().is_none_or(str::is_empty)
        {
            return Err(ConfigError::Message(
                "storage.bucket is required when storage.provider = \"gcs\"".to_string(),
            ));
        }
        if self.embedding.dimension == 0 {
            return Err(ConfigError::Message(
                "embedding.dimension must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
