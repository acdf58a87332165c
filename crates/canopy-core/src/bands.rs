use serde::{Deserialize, Serialize};

/// Band edges in Hz. Bins below `LOW_CUTOFF_HZ` are "low", bins from
/// `LOW_CUTOFF_HZ` up to but excluding `HIGH_CUTOFF_HZ` are "mid",
/// everything at or above `HIGH_CUTOFF_HZ` is "high".
pub const LOW_CUTOFF_HZ: f32 = 160.0;
pub const HIGH_CUTOFF_HZ: f32 = 1280.0;

/// One spectrum bin summarized as a render-time control signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Bin center frequency in Hz: `bin * sample_rate / fft_size`.
    pub frequency: f32,
    /// Raw analyser byte, 0-255.
    pub amplitude: u8,
}

/// The spectrum partitioned into the three named sub-bands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BandSplit {
    pub low: Vec<Band>,
    pub mid: Vec<Band>,
    pub high: Vec<Band>,
}

impl BandSplit {
    /// Partition a byte spectrum into sub-bands.
    pub fn from_spectrum(spectrum: &[u8], sample_rate: f32, fft_size: usize) -> Self {
        let mut split = BandSplit::default();
        split.repartition(spectrum, sample_rate, fft_size);
        split
    }

    /// Refill from a fresh spectrum, reusing the existing allocations.
    /// Called once per frame.
    pub fn repartition(&mut self, spectrum: &[u8], sample_rate: f32, fft_size: usize) {
        self.clear();
        for (bin, &amplitude) in spectrum.iter().enumerate() {
            let frequency = bin as f32 * sample_rate / fft_size as f32;
            let band = Band { frequency, amplitude };
            if frequency < LOW_CUTOFF_HZ {
                self.low.push(band);
            } else if frequency < HIGH_CUTOFF_HZ {
                self.mid.push(band);
            } else {
                self.high.push(band);
            }
        }
    }

    pub fn clear(&mut self) {
        self.low.clear();
        self.mid.clear();
        self.high.clear();
    }

    /// Loudest mid-band amplitude, floored at 1 so callers can use it
    /// as a multiplier without collapsing to zero.
    pub fn max_mid_amplitude(&self) -> u8 {
        self.mid
            .iter()
            .map(|b| b.amplitude)
            .max()
            .unwrap_or(0)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44100.0;
    const FFT_SIZE: usize = 8192;

    #[test]
    fn test_bin_frequency_mapping() {
        let spectrum = vec![0u8; 64];
        let split = BandSplit::from_spectrum(&spectrum, SAMPLE_RATE, FFT_SIZE);
        // bin 29 is ~156 Hz, still low; bin 30 is ~161 Hz, first mid bin
        let bin29 = 29.0 * SAMPLE_RATE / FFT_SIZE as f32;
        let bin30 = 30.0 * SAMPLE_RATE / FFT_SIZE as f32;
        assert!(bin29 < LOW_CUTOFF_HZ);
        assert!(bin30 >= LOW_CUTOFF_HZ);
        assert_eq!(split.low.len(), 30);
        assert!((split.low[29].frequency - bin29).abs() < 0.001);
        assert!((split.mid[0].frequency - bin30).abs() < 0.001);
    }

    #[test]
    fn test_cutoffs_are_inclusive_on_the_upper_side() {
        // construct exact cutoff frequencies: sample_rate = fft_size
        // makes bin index == frequency in Hz
        let spectrum = vec![0u8; 2000];
        let split = BandSplit::from_spectrum(&spectrum, 2048.0, 2048);
        assert!(split.low.iter().all(|b| b.frequency < LOW_CUTOFF_HZ));
        assert_eq!(split.mid[0].frequency, 160.0);
        assert!(split
            .mid
            .iter()
            .all(|b| b.frequency >= LOW_CUTOFF_HZ && b.frequency < HIGH_CUTOFF_HZ));
        assert_eq!(split.high[0].frequency, 1280.0);
    }

    #[test]
    fn test_all_bins_accounted_for() {
        let spectrum: Vec<u8> = (0..255).collect();
        let split = BandSplit::from_spectrum(&spectrum, SAMPLE_RATE, FFT_SIZE);
        assert_eq!(
            split.low.len() + split.mid.len() + split.high.len(),
            spectrum.len()
        );
    }

    #[test]
    fn test_max_mid_amplitude_floor() {
        let split = BandSplit::default();
        assert_eq!(split.max_mid_amplitude(), 1);

        let spectrum = vec![0u8; 256];
        let split = BandSplit::from_spectrum(&spectrum, SAMPLE_RATE, FFT_SIZE);
        assert_eq!(split.max_mid_amplitude(), 1);
    }

    #[test]
    fn test_max_mid_amplitude_picks_loudest() {
        let mut spectrum = vec![0u8; 512];
        // bin 100 at 44100/8192 is ~538 Hz, mid band
        spectrum[100] = 200;
        spectrum[101] = 150;
        let split = BandSplit::from_spectrum(&spectrum, SAMPLE_RATE, FFT_SIZE);
        assert_eq!(split.max_mid_amplitude(), 200);
    }
}
