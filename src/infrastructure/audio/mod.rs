pub mod audio_decoder;
mod ffmpeg_transcoder;
mod ffprobe_prober;
mod process;

pub use ffmpeg_transcoder::FfmpegTranscoder;
pub use ffprobe_prober::{FfprobeProber, parse_probe_output};
pub use process::{BinaryCheckError, check_binary};
