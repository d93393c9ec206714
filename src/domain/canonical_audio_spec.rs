use std::fmt;

/// The encoding every normalized artifact must have before it is embedded
/// or published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalAudioSpec {
    pub channels: u16,
    pub sample_rate: u32,
    pub codec_name: &'static str,
    pub bits_per_sample: u16,
}

impl CanonicalAudioSpec {
    pub const REQUIRED: CanonicalAudioSpec = CanonicalAudioSpec {
        channels: 1,
        sample_rate: 16_000,
        codec_name: "pcm_s16le",
        bits_per_sample: 16,
    };
}

impl fmt::Display for CanonicalAudioSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}ch/{}Hz/{}/{}bit",
            self.channels, self.sample_rate, self.codec_name, self.bits_per_sample
        )
    }
}
