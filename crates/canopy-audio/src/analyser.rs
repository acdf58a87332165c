use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

pub const DEFAULT_FFT_SIZE: usize = 8192;
const MIN_FFT_SIZE: usize = 32;

/// dB window mapped onto the 0-255 byte range.
const MIN_DB: f32 = -100.0;
const MAX_DB: f32 = -30.0;
/// Temporal smoothing applied to magnitudes between frames.
const SMOOTHING: f32 = 0.8;

/// Pull-model analyser over a ring of the most recent samples.
///
/// Mirrors the byte contract of the browser analyser node this feeds
/// replaced: `byte_time_domain` maps samples through `s * 128 + 128`,
/// and `byte_frequency` runs a Hann-windowed FFT, smooths magnitudes
/// against the previous frame, and maps decibels in [-100, -30] onto
/// 0-255. Both outputs have `fft_size / 2` entries.
pub struct Analyser {
    fft_size: usize,
    sample_rate: f32,
    fft: Arc<dyn Fft<f32>>,
    ring: Vec<f32>,
    write_pos: usize,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
}

impl Analyser {
    pub fn new(fft_size: usize, sample_rate: f32) -> Result<Self, String> {
        validate_fft_size(fft_size)?;
        let mut planner = FftPlanner::new();
        Ok(Self {
            fft_size,
            sample_rate,
            fft: planner.plan_fft_forward(fft_size),
            ring: vec![0.0; fft_size],
            write_pos: 0,
            window: hann_window(fft_size),
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; fft_size / 2],
        })
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Adopt the sample rate of a newly attached source.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Output buffer length for both domains.
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Change the analysis window. Reallocates every derived buffer
    /// and discards accumulated samples and smoothing state.
    pub fn set_fft_size(&mut self, fft_size: usize) -> Result<(), String> {
        validate_fft_size(fft_size)?;
        if fft_size == self.fft_size {
            return Ok(());
        }
        let mut planner = FftPlanner::new();
        self.fft = planner.plan_fft_forward(fft_size);
        self.fft_size = fft_size;
        self.ring = vec![0.0; fft_size];
        self.write_pos = 0;
        self.window = hann_window(fft_size);
        self.scratch = vec![Complex::new(0.0, 0.0); fft_size];
        self.smoothed = vec![0.0; fft_size / 2];
        Ok(())
    }

    /// Append samples to the analysis ring, overwriting the oldest.
    pub fn push_samples(&mut self, samples: &[f32]) {
        for &s in samples {
            self.ring[self.write_pos] = s;
            self.write_pos = (self.write_pos + 1) % self.fft_size;
        }
    }

    /// Fill `out` with the most recent `bin_count` samples as bytes.
    ///
    /// Silence maps to 128.
    pub fn byte_time_domain(&self, out: &mut [u8]) {
        let n = out.len().min(self.bin_count());
        let start = self.write_pos + self.fft_size - n;
        for (i, slot) in out.iter_mut().take(n).enumerate() {
            let s = self.ring[(start + i) % self.fft_size];
            *slot = (s * 128.0 + 128.0).clamp(0.0, 255.0) as u8;
        }
    }

    /// Fill `out` with the byte spectrum of the current ring contents.
    pub fn byte_frequency(&mut self, out: &mut [u8]) {
        // copy the ring in chronological order, windowed
        for i in 0..self.fft_size {
            let s = self.ring[(self.write_pos + i) % self.fft_size];
            self.scratch[i] = Complex::new(s * self.window[i], 0.0);
        }
        self.fft.process(&mut self.scratch);

        let norm = 1.0 / self.fft_size as f32;
        let n = out.len().min(self.bin_count());
        for (k, slot) in out.iter_mut().take(n).enumerate() {
            let magnitude = self.scratch[k].norm() * norm;
            self.smoothed[k] = SMOOTHING * self.smoothed[k] + (1.0 - SMOOTHING) * magnitude;
            let db = 20.0 * self.smoothed[k].max(1e-12).log10();
            let scaled = (db - MIN_DB) / (MAX_DB - MIN_DB) * 255.0;
            *slot = scaled.clamp(0.0, 255.0) as u8;
        }
    }
}

fn validate_fft_size(fft_size: usize) -> Result<(), String> {
    if !fft_size.is_power_of_two() || fft_size < MIN_FFT_SIZE {
        return Err(format!(
            "fft size {fft_size} must be a power of two >= {MIN_FFT_SIZE}"
        ));
    }
    Ok(())
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / size as f32).cos()))
        .collect()
}
