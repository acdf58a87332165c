use canopy_audio::AudioFeed;
use canopy_core::{VisualParameters, VizMode};

/// Wheel zoom step in pixels of trunk length.
const ZOOM_STEP: f32 = 5.0;

/// Platform-independent user input, already translated from whatever
/// key or pointer event the host produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A number key. Digits outside the mode table are ignored.
    Digit(u8),
    ToggleMute,
    ToggleInfo,
    ToggleData,
    ToggleFps,
    ToggleHelp,
    ToggleFullscreen,
    /// Reroll the foreground and background colors.
    RandomColors,
    /// Scroll wheel or touchpad. Negative `delta_y` scrolls up.
    Wheel { delta_y: f32 },
}

/// Apply one input event to the shared state.
pub fn apply_event(event: InputEvent, params: &mut VisualParameters, feed: &mut AudioFeed) {
    match event {
        InputEvent::Digit(digit) => {
            if let Some(mode) = VizMode::from_digit(digit) {
                log::debug!("switching to {} mode", mode.name());
                params.mode = mode;
            }
        }
        // the mute flag flips even before a source attaches, so a
        // source attached later starts muted
        InputEvent::ToggleMute => {
            let muted = feed.toggle_mute();
            log::debug!("audio muted: {muted}");
        }
        InputEvent::ToggleInfo => params.show_info = !params.show_info,
        InputEvent::ToggleData => params.show_data = !params.show_data,
        // the counter widget itself belongs to the host; this only
        // flips the flag it watches
        InputEvent::ToggleFps => params.show_fps = !params.show_fps,
        InputEvent::ToggleHelp => {
            params.mode = if params.mode == VizMode::Help {
                VizMode::Tree
            } else {
                VizMode::Help
            };
        }
        InputEvent::ToggleFullscreen => params.fullscreen = !params.fullscreen,
        InputEvent::RandomColors => params.randomize_colors(),
        // one delta drives both zooms; zooming out is refused while
        // the tree zoom sits below the step
        InputEvent::Wheel { delta_y } => {
            let delta = if delta_y < 0.0 {
                ZOOM_STEP
            } else if delta_y > 0.0 && params.tree.zoom.value >= ZOOM_STEP {
                -ZOOM_STEP
            } else {
                return;
            };
            params.tree.zoom.nudge(delta);
            params.spiral.zoom_level += delta;
        }
    }
}
