use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use voxgate::application::services::{AudioNormalizer, ScratchSpace, VerificationService};
use voxgate::infrastructure::audio::{FfmpegTranscoder, FfprobeProber, check_binary};
use voxgate::infrastructure::embedding::EmbedderFactory;
use voxgate::infrastructure::observability::{TracingConfig, init_tracing};
use voxgate::infrastructure::storage::ObjectStorageFactory;
use voxgate::presentation::config::StorageProviderSetting;
use voxgate::presentation::{
    AppState, Environment, Settings, create_router, create_router_with_public_files,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load configuration")?;

    init_tracing(&TracingConfig::from_settings(
        environment.as_str(),
        &settings.logging,
    ));

    for binary in [&settings.audio.ffmpeg_path, &settings.audio.ffprobe_path] {
        let version = check_binary(Path::new(binary))
            .await
            .with_context(|| format!("Required binary {} is unavailable", binary))?;
        tracing::info!(binary = %binary, version = %version, "Found audio tool");
    }

    let storage = ObjectStorageFactory::create(&settings.storage)
        .context("Failed to initialize object storage")?;

    let embedding_settings = settings.embedding.clone();
    let embedder = tokio::task::spawn_blocking(move || EmbedderFactory::create(&embedding_settings))
        .await
        .context("Speaker model loader panicked")?
        .context("Failed to load speaker embedding model")?;

    let scratch = ScratchSpace::new(settings.audio.scratch_root());
    scratch
        .ensure_root()
        .await
        .with_context(|| format!("Cannot create scratch dir {}", scratch.root().display()))?;

    let normalizer = AudioNormalizer::new(
        Arc::new(FfmpegTranscoder::new(
            &settings.audio.ffmpeg_path,
            settings.timeouts.transcode(),
        )),
        Arc::new(FfprobeProber::new(
            &settings.audio.ffprobe_path,
            settings.timeouts.probe(),
        )),
        settings.audio.software_tag.clone(),
    );

    let verification_service = Arc::new(VerificationService::new(
        storage,
        embedder,
        normalizer,
        scratch,
        settings.timeouts.download(),
    ));

    let state = AppState {
        verification_service,
        match_threshold: settings.verification.match_threshold,
    };

    let router = match settings.storage.provider {
        StorageProviderSetting::Local => {
            create_router_with_public_files(state, &PathBuf::from(&settings.storage.local_path))
        }
        StorageProviderSetting::Gcs => create_router(state),
    };

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server.host / server.port")?;
    tracing::info!(%addr, environment = %environment, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
