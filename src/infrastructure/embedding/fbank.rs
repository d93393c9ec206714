use std::f32::consts::PI;
use std::sync::Arc;

use realfft::{RealFftPlanner, RealToComplex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    Hamming,
    /// Kaldi's default: a Hann window raised to 0.85.
    Povey,
}

/// Kaldi-compatible filterbank options. Defaults match the front end the
/// wespeaker ResNet models were trained with.
#[derive(Debug, Clone)]
pub struct FbankConfig {
    pub sample_rate: u32,
    pub num_mel_bins: usize,
    pub frame_length_ms: f32,
    pub frame_shift_ms: f32,
    pub preemphasis: f32,
    pub low_freq: f32,
    /// Zero or negative values are an offset from Nyquist.
    pub high_freq: f32,
    pub window: WindowType,
    pub remove_dc_offset: bool,
    /// Scale [-1, 1] samples to the int16 range before analysis.
    pub scale_to_int16: bool,
}

impl Default for FbankConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            num_mel_bins: 80,
            frame_length_ms: 25.0,
            frame_shift_ms: 10.0,
            preemphasis: 0.97,
            low_freq: 20.0,
            high_freq: 0.0,
            window: WindowType::Hamming,
            remove_dc_offset: true,
            scale_to_int16: true,
        }
    }
}

/// Row-major `[frames, bins]` feature matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    pub frames: usize,
    pub bins: usize,
    pub data: Vec<f32>,
}

impl Features {
    pub fn row(&self, frame: usize) -> &[f32] {
        &self.data[frame * self.bins..(frame + 1) * self.bins]
    }

    /// Subtracts the per-bin mean over all frames.
    pub fn subtract_mean(&mut self) {
        if self.frames == 0 {
            return;
        }
        let mut means = vec![0.0f64; self.bins];
        for row in self.data.chunks(self.bins) {
            for (mean, value) in means.iter_mut().zip(row) {
                *mean += f64::from(*value);
            }
        }
        for mean in &mut means {
            *mean /= self.frames as f64;
        }
        for row in self.data.chunks_mut(self.bins) {
            for (value, mean) in row.iter_mut().zip(&means) {
                *value = (f64::from(*value) - mean) as f32;
            }
        }
    }
}

struct MelFilter {
    first_bin: usize,
    weights: Vec<f32>,
}

pub struct FbankExtractor {
    config: FbankConfig,
    frame_length: usize,
    frame_shift: usize,
    window: Vec<f32>,
    filters: Vec<MelFilter>,
    fft: Arc<dyn RealToComplex<f32>>,
}

impl FbankExtractor {
    pub fn new(config: FbankConfig) -> Self {
        let frame_length =
            (config.sample_rate as f32 * config.frame_length_ms / 1000.0).round() as usize;
        let frame_shift =
            (config.sample_rate as f32 * config.frame_shift_ms / 1000.0).round() as usize;
        let fft_size = frame_length.max(1).next_power_of_two();

        let window = build_window(config.window, frame_length);
        let filters = build_mel_filters(&config, fft_size);
        let fft = RealFftPlanner::<f32>::new().plan_fft_forward(fft_size);

        Self {
            config,
            frame_length,
            frame_shift: frame_shift.max(1),
            window,
            filters,
            fft,
        }
    }

    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    /// Frame count with Kaldi's `snip_edges=true`: only frames fully inside
    /// the signal are kept.
    pub fn num_frames(&self, num_samples: usize) -> usize {
        if self.frame_length == 0 || num_samples < self.frame_length {
            return 0;
        }
        1 + (num_samples - self.frame_length) / self.frame_shift
    }

    /// Log mel energies for 16 kHz mono samples in [-1, 1]. Returns `None`
    /// when the input is shorter than one frame.
    pub fn compute(&self, samples: &[f32]) -> Option<Features> {
        let frames = self.num_frames(samples.len());
        if frames == 0 {
            return None;
        }

        let bins = self.config.num_mel_bins;
        let scale = if self.config.scale_to_int16 {
            32768.0
        } else {
            1.0
        };

        let mut input = self.fft.make_input_vec();
        let mut spectrum = self.fft.make_output_vec();
        let mut scratch = self.fft.make_scratch_vec();
        let mut frame = vec![0.0f32; self.frame_length];
        let mut power = vec![0.0f32; spectrum.len()];
        let mut data = Vec::with_capacity(frames * bins);

        for index in 0..frames {
            let offset = index * self.frame_shift;
            for (dst, src) in frame
                .iter_mut()
                .zip(&samples[offset..offset + self.frame_length])
            {
                *dst = src * scale;
            }

            if self.config.remove_dc_offset {
                let mean = frame.iter().sum::<f32>() / self.frame_length as f32;
                frame.iter_mut().for_each(|v| *v -= mean);
            }

            let coeff = self.config.preemphasis;
            if coeff != 0.0 {
                for i in (1..self.frame_length).rev() {
                    frame[i] -= coeff * frame[i - 1];
                }
                frame[0] -= coeff * frame[0];
            }

            input.fill(0.0);
            for ((dst, src), w) in input.iter_mut().zip(&frame).zip(&self.window) {
                *dst = src * w;
            }

            // Buffer lengths come from the planner, so this cannot fail.
            if self
                .fft
                .process_with_scratch(&mut input, &mut spectrum, &mut scratch)
                .is_err()
            {
                return None;
            }

            for (p, c) in power.iter_mut().zip(&spectrum) {
                *p = c.norm_sqr();
            }

            for filter in &self.filters {
                let energy: f32 = filter
                    .weights
                    .iter()
                    .zip(&power[filter.first_bin..])
                    .map(|(w, p)| w * p)
                    .sum();
                data.push(energy.max(f32::EPSILON).ln());
            }
        }

        Some(Features { frames, bins, data })
    }
}

fn build_window(window: WindowType, length: usize) -> Vec<f32> {
    if length < 2 {
        return vec![1.0; length];
    }
    let denom = (length - 1) as f32;
    (0..length)
        .map(|i| {
            let phase = 2.0 * PI * i as f32 / denom;
            match window {
                WindowType::Hamming => 0.54 - 0.46 * phase.cos(),
                WindowType::Povey => (0.5 - 0.5 * phase.cos()).powf(0.85),
            }
        })
        .collect()
}

fn mel_scale(freq: f32) -> f32 {
    1127.0 * (1.0 + freq / 700.0).ln()
}

fn build_mel_filters(config: &FbankConfig, fft_size: usize) -> Vec<MelFilter> {
    let nyquist = config.sample_rate as f32 / 2.0;
    let high_freq = if config.high_freq <= 0.0 {
        nyquist + config.high_freq
    } else {
        config.high_freq
    };

    let num_fft_bins = fft_size / 2;
    let bin_width = config.sample_rate as f32 / fft_size as f32;
    let mel_low = mel_scale(config.low_freq);
    let mel_high = mel_scale(high_freq);
    let mel_delta = (mel_high - mel_low) / (config.num_mel_bins + 1) as f32;

    (0..config.num_mel_bins)
        .map(|bin| {
            let left = mel_low + bin as f32 * mel_delta;
            let center = left + mel_delta;
            let right = center + mel_delta;

            let mut first_bin = None;
            let mut weights = Vec::new();
            for k in 0..num_fft_bins {
                let mel = mel_scale(bin_width * k as f32);
                if mel > left && mel < right {
                    let weight = if mel <= center {
                        (mel - left) / (center - left)
                    } else {
                        (right - mel) / (right - center)
                    };
                    first_bin.get_or_insert(k);
                    weights.push(weight);
                }
            }

            MelFilter {
                first_bin: first_bin.unwrap_or(0),
                weights,
            }
        })
        .collect()
}
