use canopy_core::bands::BandSplit;

use crate::analyser::{Analyser, DEFAULT_FFT_SIZE};
use crate::source::{AudioInput, SourceKind};

const DEFAULT_SAMPLE_RATE: f32 = 44100.0;

/// The currently attached source and its playout state.
struct ActiveSource {
    kind: SourceKind,
    name: String,
    /// Decoded file samples; empty for live capture.
    samples: Vec<f32>,
    playhead: usize,
    /// Whether end-of-stream has already been reported.
    ended: bool,
    /// The destination (speaker) link. The analyser link is separate
    /// and never severed by muting.
    output_connected: bool,
}

/// The audio-analysis stage the render pipeline reads every frame.
///
/// Owns the analyser, the attached source, and the derived buffers:
/// time-domain bytes, frequency bytes, and the banded summaries. The
/// derived buffers are allocated when the first source attaches and
/// only reallocated when the fft size changes; before a source exists
/// `refresh` is a no-op so the renderer degrades gracefully.
pub struct AudioFeed {
    analyser: Analyser,
    muted: bool,
    /// Set by a deliberate source switch so the old source's ended
    /// notification is distinguished from a natural end-of-file.
    stopped: bool,
    source: Option<ActiveSource>,
    wave_data: Vec<u8>,
    freq_data: Vec<u8>,
    bands: BandSplit,
}

impl AudioFeed {
    pub fn new() -> Self {
        // the default fft size is a valid power of two
        let analyser = Analyser::new(DEFAULT_FFT_SIZE, DEFAULT_SAMPLE_RATE)
            .expect("default analyser configuration is valid");
        Self {
            analyser,
            muted: false,
            stopped: false,
            source: None,
            wave_data: Vec::new(),
            freq_data: Vec::new(),
            bands: BandSplit::default(),
        }
    }

    pub fn fft_size(&self) -> usize {
        self.analyser.fft_size()
    }

    pub fn sample_rate(&self) -> f32 {
        self.analyser.sample_rate()
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.name.as_str())
    }

    pub fn source_kind(&self) -> Option<SourceKind> {
        self.source.as_ref().map(|s| s.kind)
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Attach a new source as one transition: tear down the old one,
    /// arm the stopped flag (exactly once per switch), adopt the new
    /// sample rate, and allocate the derived buffers if this is the
    /// first attach.
    pub fn attach(&mut self, input: AudioInput) {
        self.stopped = self.source.is_some();

        let (kind, name, samples, sample_rate) = match input {
            AudioInput::File { name, audio } => {
                (SourceKind::File, name, audio.samples, audio.sample_rate)
            }
            AudioInput::Microphone { stream } => (
                SourceKind::Microphone,
                stream.name,
                Vec::new(),
                stream.sample_rate,
            ),
        };

        log::debug!("attaching {} source: {name}", kind.name());
        self.analyser.set_sample_rate(sample_rate as f32);
        self.source = Some(ActiveSource {
            kind,
            name,
            samples,
            playhead: 0,
            ended: false,
            output_connected: !self.muted,
        });
        self.ensure_buffers();
    }

    /// Handle an end-of-stream notification. Returns true for a
    /// natural end (the caller restores the help text); false when the
    /// end was caused by a deliberate switch, which is swallowed and
    /// clears the flag for the next one.
    pub fn notify_ended(&mut self) -> bool {
        if self.stopped {
            self.stopped = false;
            false
        } else {
            true
        }
    }

    /// Feed live-capture samples into the analyser.
    pub fn push_samples(&mut self, samples: &[f32]) {
        self.analyser.push_samples(samples);
    }

    /// Play out the next `frames` samples of an attached file source.
    ///
    /// Returns false exactly once, when the playout crosses the end of
    /// the file; microphone sources and already-finished files return
    /// true (nothing to report).
    pub fn advance_playout(&mut self, frames: usize) -> bool {
        let Some(source) = self.source.as_mut() else {
            return true;
        };
        if source.samples.is_empty() || source.ended {
            return true;
        }

        let end = (source.playhead + frames).min(source.samples.len());
        self.analyser
            .push_samples(&source.samples[source.playhead..end]);
        source.playhead = end;

        if source.playhead >= source.samples.len() {
            source.ended = true;
            return false;
        }
        true
    }

    /// Mute or unmute playback. Severs or restores the destination
    /// link only; the analyser link stays up so the visualization
    /// keeps moving while the output is silent.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(source) = self.source.as_mut() {
            source.output_connected = !muted;
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.set_muted(!self.muted);
        self.muted
    }

    /// Whether the speaker link is up (diagnostics only).
    pub fn output_connected(&self) -> bool {
        self.source
            .as_ref()
            .map(|s| s.output_connected)
            .unwrap_or(false)
    }

    /// Change the analysis window; reallocates derived buffers.
    pub fn set_fft_size(&mut self, fft_size: usize) -> Result<(), String> {
        self.analyser.set_fft_size(fft_size)?;
        if !self.wave_data.is_empty() {
            self.ensure_buffers();
        }
        Ok(())
    }

    /// Pull the latest time/frequency bytes and recompute the banded
    /// summaries. No-op until a source has attached.
    pub fn refresh(&mut self) {
        if self.wave_data.is_empty() {
            return;
        }
        self.analyser.byte_time_domain(&mut self.wave_data);
        self.analyser.byte_frequency(&mut self.freq_data);
        self.bands.repartition(
            &self.freq_data,
            self.analyser.sample_rate(),
            self.analyser.fft_size(),
        );
    }

    /// The last refreshed waveform bytes; `None` before the first
    /// source attaches.
    pub fn wave_data(&self) -> Option<&[u8]> {
        if self.wave_data.is_empty() {
            None
        } else {
            Some(&self.wave_data)
        }
    }

    /// The last refreshed spectrum bytes; `None` before the first
    /// source attaches.
    pub fn freq_data(&self) -> Option<&[u8]> {
        if self.freq_data.is_empty() {
            None
        } else {
            Some(&self.freq_data)
        }
    }

    pub fn bands(&self) -> &BandSplit {
        &self.bands
    }

    fn ensure_buffers(&mut self) {
        let bins = self.analyser.bin_count();
        if self.wave_data.len() != bins {
            self.wave_data = vec![128; bins];
            self.freq_data = vec![0; bins];
        }
    }
}

impl Default for AudioFeed {
    fn default() -> Self {
        Self::new()
    }
}
