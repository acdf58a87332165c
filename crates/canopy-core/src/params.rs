use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::oscillator::Oscillator;
use crate::rng::XorShift32;

/// Bounds the structural parameters are kept inside, whichever of the
/// mutator, the panel, or key events writes them.
pub const DEPTH_MIN: u32 = 2;
pub const DEPTH_MAX: u32 = 10;
pub const BRANCH_FACTOR_MIN: u32 = 1;
pub const BRANCH_FACTOR_MAX: u32 = 16;

/// The active visualization, dispatched with an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VizMode {
    Help,
    Tree,
    Oscope,
    Bars,
    Spiral,
}

impl VizMode {
    pub const ALL: [VizMode; 5] = [
        VizMode::Help,
        VizMode::Tree,
        VizMode::Oscope,
        VizMode::Bars,
        VizMode::Spiral,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            VizMode::Help => "help",
            VizMode::Tree => "tree",
            VizMode::Oscope => "oscope",
            VizMode::Bars => "bars",
            VizMode::Spiral => "spiral",
        }
    }

    /// Map a digit key to a mode. Digit 0 and out-of-range digits
    /// return `None` so the current mode is left unchanged.
    pub fn from_digit(digit: u8) -> Option<VizMode> {
        if digit == 0 {
            return None;
        }
        Self::ALL.get(digit as usize).copied()
    }
}

/// Canvas compositing operation applied before drawing a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompositeMode {
    SourceOver,
    Lighter,
    Multiply,
    Screen,
    Xor,
}

impl CompositeMode {
    /// The canvas-side operation name.
    pub fn name(&self) -> &'static str {
        match self {
            CompositeMode::SourceOver => "source-over",
            CompositeMode::Lighter => "lighter",
            CompositeMode::Multiply => "multiply",
            CompositeMode::Screen => "screen",
            CompositeMode::Xor => "xor",
        }
    }
}

/// Fractal tree geometry and its continuously-evolving drive values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeParams {
    pub depth: u32,
    pub branch_factor: u32,
    /// Accumulates by `rotation_speed / 100` every frame.
    pub branch_angle: f32,
    /// Recomputed every frame as `|sin(grow_speed)| * 1.5`.
    pub grow_factor: f32,
    /// Accumulates by 0.001 every frame (slow breathing).
    pub grow_speed: f32,
    pub rotation_speed: f32,
    pub zoom: Oscillator,
    /// Branches drawn this frame; reset at the start of every tree pass.
    pub total_branches: u32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            depth: 3,
            branch_factor: 8,
            branch_angle: 0.0,
            grow_factor: 1.0,
            grow_speed: 0.0,
            rotation_speed: 5.0,
            zoom: Oscillator::new(100.0, 0.0, 0.0, 2000.0),
            total_branches: 0,
        }
    }
}

impl TreeParams {
    pub fn set_depth(&mut self, depth: u32) {
        self.depth = depth.clamp(DEPTH_MIN, DEPTH_MAX);
    }

    pub fn set_branch_factor(&mut self, branch_factor: u32) {
        self.branch_factor = branch_factor.clamp(BRANCH_FACTOR_MIN, BRANCH_FACTOR_MAX);
    }

    /// Angular spread between sibling branches, degrees.
    pub fn angle_each(&self) -> f32 {
        360.0 / self.branch_factor as f32
    }
}

/// Frequency-bar geometry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BarParams {
    pub height: f32,
    pub width: f32,
    pub gap: f32,
}

impl Default for BarParams {
    fn default() -> Self {
        Self {
            height: 2.0,
            width: 1.0,
            gap: 2.0,
        }
    }
}

/// Polar spiral drive values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpiralParams {
    /// Rotation carried over between frames; drifts a little each tick.
    pub angle: f32,
    /// Radius multiplier, independent of the tree zoom.
    pub zoom_level: f32,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            angle: 0.0,
            zoom_level: 100.0,
        }
    }
}

/// The shared visual-state record read and written by every component:
/// the render pipeline advances its oscillators, the structural mutator
/// nudges its tree geometry, and input events flip its switches.
///
/// One instance lives for the session inside the main-loop context;
/// nothing here is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualParameters {
    pub mode: VizMode,
    pub composite: CompositeMode,
    pub tree: TreeParams,
    pub bars: BarParams,
    pub spiral: SpiralParams,

    pub line_curve: bool,
    pub line_width: f32,
    /// Scale line width by remaining recursion depth.
    pub line_diff: bool,
    pub line_dash_width: f32,
    /// Accumulator for dash-width breathing; advances every frame.
    pub line_dash_speed: f32,

    pub foreground: Rgba,
    pub background: Rgba,

    pub show_labels: bool,
    pub show_fps: bool,
    pub show_info: bool,
    pub show_data: bool,
    pub clear_frames: bool,
    pub fullscreen: bool,

    pub fps: u32,
    pub font_size: f32,
    pub line_height: f32,

    /// Status lines drawn in the overlay.
    pub info: Vec<String>,
    /// The help text restored when playback ends naturally.
    pub default_info: Vec<String>,

    #[serde(skip)]
    rng: XorShift32,
}

impl Default for VisualParameters {
    fn default() -> Self {
        Self {
            mode: VizMode::Tree,
            composite: CompositeMode::SourceOver,
            tree: TreeParams::default(),
            bars: BarParams::default(),
            spiral: SpiralParams::default(),
            line_curve: false,
            line_width: 1.0,
            line_diff: false,
            line_dash_width: 0.0,
            line_dash_speed: 0.0,
            foreground: Rgba::rgb(0xe1, 0xe1, 0xe1),
            background: Rgba::rgb(0x57, 0x54, 0x54),
            show_labels: false,
            show_fps: false,
            show_info: true,
            show_data: false,
            clear_frames: true,
            fullscreen: false,
            fps: 60,
            font_size: 12.0,
            line_height: 1.2,
            info: Vec::new(),
            default_info: Vec::new(),
            rng: XorShift32::default(),
        }
    }
}

impl VisualParameters {
    /// Overlay line spacing in pixels.
    pub fn overlay_line_height(&self) -> f32 {
        self.font_size * self.line_height
    }

    /// Replace the status block with a single line.
    pub fn set_status(&mut self, line: impl Into<String>) {
        self.info = vec![line.into()];
    }

    /// Restore the default help text.
    pub fn reset_info(&mut self) {
        self.info = self.default_info.clone();
    }

    /// Reroll both draw colors.
    pub fn randomize_colors(&mut self) {
        self.foreground = Rgba::random(&mut self.rng);
        self.background = Rgba::random(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_digit() {
        assert_eq!(VizMode::from_digit(0), None);
        assert_eq!(VizMode::from_digit(1), Some(VizMode::Tree));
        assert_eq!(VizMode::from_digit(2), Some(VizMode::Oscope));
        assert_eq!(VizMode::from_digit(3), Some(VizMode::Bars));
        assert_eq!(VizMode::from_digit(4), Some(VizMode::Spiral));
        assert_eq!(VizMode::from_digit(5), None);
        assert_eq!(VizMode::from_digit(9), None);
    }

    #[test]
    fn test_mode_names() {
        for mode in VizMode::ALL {
            assert!(!mode.name().is_empty());
        }
        assert_eq!(VizMode::Oscope.name(), "oscope");
    }

    #[test]
    fn test_structural_clamps() {
        let mut tree = TreeParams::default();
        tree.set_depth(1);
        assert_eq!(tree.depth, DEPTH_MIN);
        tree.set_depth(99);
        assert_eq!(tree.depth, DEPTH_MAX);
        tree.set_branch_factor(0);
        assert_eq!(tree.branch_factor, BRANCH_FACTOR_MIN);
        tree.set_branch_factor(40);
        assert_eq!(tree.branch_factor, BRANCH_FACTOR_MAX);
    }

    #[test]
    fn test_angle_each() {
        let mut tree = TreeParams::default();
        tree.branch_factor = 8;
        assert_eq!(tree.angle_each(), 45.0);
        tree.branch_factor = 1;
        assert_eq!(tree.angle_each(), 360.0);
    }

    #[test]
    fn test_defaults_match_startup_state() {
        let p = VisualParameters::default();
        assert_eq!(p.mode, VizMode::Tree);
        assert_eq!(p.tree.depth, 3);
        assert_eq!(p.tree.branch_factor, 8);
        assert_eq!(p.tree.zoom.value, 100.0);
        assert_eq!(p.tree.zoom.max, 2000.0);
        assert_eq!(p.fps, 60);
        assert!(p.clear_frames);
        assert_eq!(p.foreground, Rgba::rgb(0xe1, 0xe1, 0xe1));
    }

    #[test]
    fn test_randomize_colors_rerolls_both() {
        let mut p = VisualParameters::default();
        let (fg, bg) = (p.foreground, p.background);
        p.randomize_colors();
        assert_ne!(p.foreground, fg);
        assert_ne!(p.background, bg);
        assert_eq!(p.foreground.a, 1.0);

        // consecutive rolls keep moving
        let fg = p.foreground;
        p.randomize_colors();
        assert_ne!(p.foreground, fg);
    }

    #[test]
    fn test_set_status_and_reset() {
        let mut p = VisualParameters::default();
        p.default_info = vec!["a".into(), "b".into()];
        p.set_status("playing: song.mp3");
        assert_eq!(p.info, vec!["playing: song.mp3".to_string()]);
        p.reset_info();
        assert_eq!(p.info.len(), 2);
    }
}
