#[path = "../../helpers/mod.rs"]
mod helpers;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use voxgate::application::ports::{MediaProber, TranscodeError, TranscodeRequest, Transcoder};
use voxgate::application::services::{AudioNormalizer, DEFAULT_SOFTWARE_TAG};
use voxgate::domain::{AudioFormatTag, CanonicalAudioSpec, LocalAudioFile, SpeakerIdentity};
use voxgate::infrastructure::audio::{FfmpegTranscoder, FfprobeProber, check_binary};

use helpers::{sine_wave, write_wav};

const TIMEOUT: Duration = Duration::from_secs(30);

fn tools_available() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|binary| {
        std::process::Command::new(binary)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    })
}

fn request(input: &str, output: &str) -> TranscodeRequest {
    TranscodeRequest {
        input: PathBuf::from(input),
        output: PathBuf::from(output),
        target: CanonicalAudioSpec::REQUIRED,
        metadata: vec![
            ("artist".to_string(), "alice".to_string()),
            ("title".to_string(), "Processed by alice".to_string()),
        ],
    }
}

#[test]
fn given_request_when_building_args_then_target_encoding_and_metadata_are_passed() {
    let args: Vec<String> = FfmpegTranscoder::build_args(&request("in.m4a", "out.wav"))
        .into_iter()
        .map(|a| a.into_string().unwrap())
        .collect();
    let joined = args.join(" ");

    assert!(joined.contains("-i in.m4a"));
    assert!(joined.contains("-ac 1"));
    assert!(joined.contains("-ar 16000"));
    assert!(joined.contains("-c:a pcm_s16le"));
    assert!(joined.contains("-metadata artist=alice"));
    assert!(args.contains(&"title=Processed by alice".to_string()));
    assert_eq!(args[args.len() - 2], "-y");
    assert_eq!(args.last().unwrap(), "out.wav");
}

#[tokio::test]
async fn given_missing_binary_when_transcoding_then_returns_spawn_error() {
    let transcoder = FfmpegTranscoder::new("/nonexistent/ffmpeg-binary", TIMEOUT);

    let result = transcoder.transcode(&request("in.wav", "out.wav")).await;

    assert!(matches!(result, Err(TranscodeError::Spawn(_))));
}

#[tokio::test]
async fn given_missing_binary_when_checking_then_returns_error() {
    let result = check_binary(Path::new("/nonexistent/ffprobe-binary")).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn given_installed_ffmpeg_when_checking_then_returns_version_line() {
    if !tools_available() {
        return;
    }

    let version = check_binary(Path::new("ffmpeg")).await.unwrap();

    assert!(version.starts_with("ffmpeg version"));
}

#[tokio::test]
async fn given_stereo_44k_wav_when_normalizing_then_output_is_canonical() {
    if !tools_available() {
        return;
    }

    let dir = tempfile::TempDir::new().unwrap();
    let input = LocalAudioFile::new(dir.path().join("original.wav"), AudioFormatTag::Raw);
    let output = LocalAudioFile::new(dir.path().join("processed.wav"), AudioFormatTag::Raw);
    let stereo: Vec<i16> = sine_wave(440.0, 44_100, 44_100)
        .into_iter()
        .flat_map(|s| [s, s])
        .collect();
    write_wav(input.path(), 44_100, 2, &stereo);

    let normalizer = AudioNormalizer::new(
        Arc::new(FfmpegTranscoder::new("ffmpeg", TIMEOUT)),
        Arc::new(FfprobeProber::new("ffprobe", TIMEOUT)),
        DEFAULT_SOFTWARE_TAG,
    );
    let identity = SpeakerIdentity::parse("alice").unwrap();

    let normalized = normalizer.normalize(&input, &output, &identity).await.unwrap();

    assert_eq!(normalized.file.format(), AudioFormatTag::Canonical);
    assert!(normalized.probe.conforms_to(&CanonicalAudioSpec::REQUIRED));
    let duration = normalized.probe.duration_secs.unwrap();
    assert!((duration - 1.0).abs() < 0.05);
}

#[tokio::test]
async fn given_normalized_output_when_normalizing_again_then_result_is_still_canonical() {
    if !tools_available() {
        return;
    }

    let dir = tempfile::TempDir::new().unwrap();
    let original = LocalAudioFile::new(dir.path().join("original.wav"), AudioFormatTag::Raw);
    let first = LocalAudioFile::new(dir.path().join("processed_1.wav"), AudioFormatTag::Raw);
    let second = LocalAudioFile::new(dir.path().join("processed_2.wav"), AudioFormatTag::Raw);
    let stereo: Vec<i16> = sine_wave(523.0, 48_000, 24_000)
        .into_iter()
        .flat_map(|s| [s, s / 2])
        .collect();
    write_wav(original.path(), 48_000, 2, &stereo);

    let normalizer = AudioNormalizer::new(
        Arc::new(FfmpegTranscoder::new("ffmpeg", TIMEOUT)),
        Arc::new(FfprobeProber::new("ffprobe", TIMEOUT)),
        DEFAULT_SOFTWARE_TAG,
    );
    let identity = SpeakerIdentity::parse("alice").unwrap();

    let once = normalizer.normalize(&original, &first, &identity).await.unwrap();
    let twice = normalizer.normalize(&once.file, &second, &identity).await.unwrap();

    assert!(once.probe.conforms_to(&CanonicalAudioSpec::REQUIRED));
    assert!(twice.probe.conforms_to(&CanonicalAudioSpec::REQUIRED));
    assert_eq!(twice.file.format(), AudioFormatTag::Canonical);
    let (d1, d2) = (
        once.probe.duration_secs.unwrap(),
        twice.probe.duration_secs.unwrap(),
    );
    assert!((d1 - d2).abs() < 0.01);
}

#[tokio::test]
async fn given_existing_output_when_transcoding_then_it_is_overwritten() {
    if !tools_available() {
        return;
    }

    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("original.wav");
    let output = dir.path().join("processed.wav");
    write_wav(&input, 16_000, 1, &sine_wave(220.0, 16_000, 8_000));
    std::fs::write(&output, b"stale").unwrap();

    let transcoder = FfmpegTranscoder::new("ffmpeg", TIMEOUT);
    transcoder
        .transcode(&request(input.to_str().unwrap(), output.to_str().unwrap()))
        .await
        .unwrap();

    let probe = FfprobeProber::new("ffprobe", TIMEOUT)
        .probe(&output)
        .await
        .unwrap();
    assert_eq!(probe.codec_name.as_deref(), Some("pcm_s16le"));
}

#[tokio::test]
async fn given_non_audio_input_when_transcoding_then_returns_failure_with_stderr() {
    if !tools_available() {
        return;
    }

    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, b"this is not audio").unwrap();
    let output = dir.path().join("processed.wav");

    let result = FfmpegTranscoder::new("ffmpeg", TIMEOUT)
        .transcode(&request(input.to_str().unwrap(), output.to_str().unwrap()))
        .await;

    match result {
        Err(TranscodeError::Failed { stderr, .. }) => assert!(!stderr.is_empty()),
        other => panic!("expected transcoder failure, got {:?}", other),
    }
}
