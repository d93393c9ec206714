mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AudioSettings, EmbeddingSettings, LoggingSettings, ServerSettings, Settings,
    StorageProviderSetting, StorageSettings, TimeoutSettings, VerificationSettings,
};
