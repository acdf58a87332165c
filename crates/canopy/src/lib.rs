//! Audio-reactive fractal visualizer core.
//!
//! `Visualizer` wires the three stages together: the audio feed, the
//! shared visual parameters, and the structural mutator. A host either
//! drives frames itself (`render` plus `tick_mutator`) or hands
//! everything to the background `MainLoop` via `run`.

use canopy_audio::source::load_dropped_audio;
use canopy_core::{StructuralMutator, SystemClock, VisualParameters};
use canopy_render::frame::render_frame;
use canopy_render::input::apply_event;
use canopy_render::sched::VizContext;
use crossbeam::channel::Receiver;

pub use canopy_audio::{
    decode_audio, AudioError, AudioFeed, AudioInput, CaptureProvider, CaptureStream, DecodedAudio,
};
pub use canopy_core::{Oscillator, Rgba, TreeParams, VizMode};
pub use canopy_render::{DrawSurface, InputEvent, MainLoop, RecordingSurface};

/// The help overlay shown before any audio attaches and after
/// playback ends.
fn default_help() -> Vec<String> {
    vec![
        format!("canopy v{}", env!("CARGO_PKG_VERSION")),
        "drag an audio file here to start or".to_string(),
        "press r to capture audio from microphone".to_string(),
        "press m to mute audio".to_string(),
        "press h to toggle all options".to_string(),
        "press f to toggle fullscreen".to_string(),
        "zoom with mouse wheel or touchpad".to_string(),
    ]
}

/// A complete visualizer session.
pub struct Visualizer {
    params: VisualParameters,
    feed: AudioFeed,
    mutator: StructuralMutator,
    clock: SystemClock,
}

impl Visualizer {
    pub fn new() -> Self {
        let mut params = VisualParameters::default();
        params.default_info = default_help();
        params.reset_info();
        Self {
            params,
            feed: AudioFeed::new(),
            mutator: StructuralMutator::new(),
            clock: SystemClock::new(),
        }
    }

    pub fn params(&self) -> &VisualParameters {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut VisualParameters {
        &mut self.params
    }

    pub fn feed(&self) -> &AudioFeed {
        &self.feed
    }

    /// Attach a new source and announce it in the overlay.
    pub fn attach_audio(&mut self, input: AudioInput) {
        self.params.set_status(format!("playing: {}", input.name()));
        self.params.show_info = true;
        self.feed.attach(input);
    }

    /// Decode a dropped file and attach it. On failure the error lands
    /// in the overlay status line and the current source keeps playing.
    pub fn load_file(&mut self, name: &str, media_type: &str, data: &[u8]) -> bool {
        self.params.set_status(format!("loading: {name}"));
        match load_dropped_audio(name, media_type, data) {
            Ok(input) => {
                self.attach_audio(input);
                true
            }
            Err(err) => {
                log::warn!("failed to load {name}: {err}");
                self.params.set_status(err.status_line());
                false
            }
        }
    }

    /// Ask the platform for a microphone stream and attach it.
    pub fn capture(&mut self, provider: &mut impl CaptureProvider) -> bool {
        match provider.capture() {
            Ok(stream) => {
                self.attach_audio(AudioInput::Microphone { stream });
                true
            }
            Err(err) => {
                log::warn!("capture failed: {err}");
                self.params.set_status(err.status_line());
                false
            }
        }
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        apply_event(event, &mut self.params, &mut self.feed);
    }

    /// One structural-mutation step. Call at a 1-second cadence when
    /// driving frames manually.
    pub fn tick_mutator(&mut self) {
        self.mutator.tick(&self.clock, &mut self.params.tree);
    }

    /// Play out one frame's worth of audio and render. When playback
    /// ends naturally the overlay falls back to the help text.
    pub fn render(&mut self, surface: &mut impl DrawSurface) {
        let frames = (self.feed.sample_rate() / self.params.fps.max(1) as f32) as usize;
        if !self.feed.advance_playout(frames) && self.feed.notify_ended() {
            log::info!("playback finished");
            self.params.reset_info();
        }
        render_frame(surface, &mut self.params, &mut self.feed);
    }

    /// Hand the session to the background loop. The returned handle
    /// gives the session state back on `stop()`.
    pub fn run(
        self,
        surface: impl DrawSurface + Send + 'static,
        event_rx: Receiver<InputEvent>,
    ) -> MainLoop {
        let context = VizContext {
            params: self.params,
            feed: self.feed,
            mutator: self.mutator,
        };
        MainLoop::start(context, surface, event_rx)
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}
