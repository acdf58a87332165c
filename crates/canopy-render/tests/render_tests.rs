use canopy_audio::{AudioFeed, AudioInput, DecodedAudio};
use canopy_core::{VisualParameters, VizMode};
use canopy_render::{
    apply_event, render_frame, DrawOp, InputEvent, RecordingSurface,
};

// ── Helpers ──────────────────────────────────────────────────────

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;
const SAMPLE_RATE: u32 = 44100;

fn sine(freq: f32, secs: f32) -> Vec<f32> {
    let n = (SAMPLE_RATE as f32 * secs) as usize;
    (0..n)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            0.5 * (2.0 * std::f32::consts::PI * freq * t).sin()
        })
        .collect()
}

/// A feed with a 440 Hz file attached and one playout block analysed.
fn feed_with_tone() -> AudioFeed {
    let mut feed = AudioFeed::new();
    feed.attach(AudioInput::File {
        name: "tone.wav".into(),
        audio: DecodedAudio {
            samples: sine(440.0, 1.0),
            sample_rate: SAMPLE_RATE,
        },
    });
    feed.advance_playout(feed.fft_size());
    feed.refresh();
    feed
}

/// Node count of a full tree: (b^d - 1) / (b - 1).
fn expected_nodes(b: u64, d: u32) -> u64 {
    if b == 1 {
        d as u64
    } else {
        (b.pow(d) - 1) / (b - 1)
    }
}

fn geometry_ops(surface: &RecordingSurface) -> usize {
    surface.count(|op| {
        matches!(
            op,
            DrawOp::MoveTo(..) | DrawOp::LineTo(..) | DrawOp::QuadraticTo { .. }
        )
    })
}

// ── 1. Tree mode end to end ─────────────────────────────────────

#[test]
fn tree_frame_visits_expected_node_count() {
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);
    let mut params = VisualParameters::default();
    params.tree.set_depth(3);
    params.tree.set_branch_factor(6);
    let mut feed = feed_with_tone();

    render_frame(&mut surface, &mut params, &mut feed);

    assert_eq!(params.tree.total_branches as u64, expected_nodes(6, 3));
    assert!(surface.all_coords_finite());
    // every node strokes except the recursion seed
    assert_eq!(surface.strokes() as u64, expected_nodes(6, 3) - 1);
}

#[test]
fn tree_grows_with_repeated_frames() {
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);
    let mut params = VisualParameters::default();
    let mut feed = feed_with_tone();

    let angle_before = params.tree.branch_angle;
    for _ in 0..30 {
        surface.clear();
        render_frame(&mut surface, &mut params, &mut feed);
        assert!(surface.all_coords_finite());
    }
    // continuous parameters drift every frame
    assert!(params.tree.branch_angle > angle_before);
    assert!(params.tree.grow_speed > 0.0);
    assert!(params.tree.grow_factor >= 0.0 && params.tree.grow_factor <= 1.5);
}

#[test]
fn zoom_stays_inside_its_bounds() {
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);
    let mut params = VisualParameters::default();
    params.tree.zoom.speed = 7.0;
    let mut feed = feed_with_tone();

    for _ in 0..2000 {
        surface.clear();
        render_frame(&mut surface, &mut params, &mut feed);
        let zoom = params.tree.zoom.value;
        assert!(
            (params.tree.zoom.min..=params.tree.zoom.max).contains(&zoom),
            "zoom {zoom} escaped its bounds"
        );
    }
}

// ── 2. Graceful degradation without audio ───────────────────────

#[test]
fn frames_without_audio_draw_overlay_only() {
    for mode in [VizMode::Tree, VizMode::Oscope, VizMode::Bars, VizMode::Spiral] {
        let mut surface = RecordingSurface::new(WIDTH, HEIGHT);
        let mut params = VisualParameters::default();
        params.mode = mode;
        params.info = vec!["drop a file".into()];
        let mut feed = AudioFeed::new();

        render_frame(&mut surface, &mut params, &mut feed);

        assert_eq!(
            geometry_ops(&surface),
            0,
            "{} mode drew geometry without audio",
            mode.name()
        );
        assert_eq!(surface.texts(), vec!["drop a file"]);
    }
}

// ── 3. Oscilloscope mode ────────────────────────────────────────

#[test]
fn oscilloscope_draws_one_polyline() {
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);
    let mut params = VisualParameters::default();
    params.mode = VizMode::Oscope;
    params.show_info = false;
    let mut feed = feed_with_tone();

    render_frame(&mut surface, &mut params, &mut feed);

    let bins = feed.fft_size() / 2;
    assert_eq!(surface.count(|op| matches!(op, DrawOp::MoveTo(..))), 1);
    // one segment per remaining sample plus the closing run-out
    assert_eq!(surface.count(|op| matches!(op, DrawOp::LineTo(..))), bins);
    assert_eq!(surface.strokes(), 1);
}

#[test]
fn silent_oscilloscope_is_a_flat_midline() {
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);
    let mut params = VisualParameters::default();
    params.mode = VizMode::Oscope;
    params.show_info = false;
    let mut feed = AudioFeed::new();
    feed.attach(AudioInput::File {
        name: "silence.wav".into(),
        audio: DecodedAudio {
            samples: vec![0.0; SAMPLE_RATE as usize],
            sample_rate: SAMPLE_RATE,
        },
    });
    feed.advance_playout(feed.fft_size());

    render_frame(&mut surface, &mut params, &mut feed);

    // silence encodes as byte 128, which lands exactly on the midline
    for op in &surface.ops {
        if let DrawOp::LineTo(_, y) = op {
            assert_eq!(*y, HEIGHT / 2.0);
        }
    }
}

// ── 4. Bars and spiral modes ────────────────────────────────────

#[test]
fn bars_draw_one_rect_per_bin() {
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);
    let mut params = VisualParameters::default();
    params.mode = VizMode::Bars;
    params.show_info = false;
    let mut feed = feed_with_tone();

    render_frame(&mut surface, &mut params, &mut feed);

    let bins = feed.fft_size() / 2;
    // one background clear plus one rect per spectrum bin
    let rects = surface.count(|op| matches!(op, DrawOp::FillRect { .. }));
    assert_eq!(rects, bins + 1);
    assert!(surface.all_coords_finite());
}

#[test]
fn spiral_draws_one_point_per_sample() {
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);
    let mut params = VisualParameters::default();
    params.mode = VizMode::Spiral;
    params.show_info = false;
    let mut feed = feed_with_tone();

    let angle_before = params.spiral.angle;
    render_frame(&mut surface, &mut params, &mut feed);

    let bins = feed.fft_size() / 2;
    let rects = surface.count(|op| matches!(op, DrawOp::FillRect { .. }));
    assert_eq!(rects, bins + 1);
    assert!(params.spiral.angle > angle_before);
}

// ── 5. Input events through the pipeline ────────────────────────

#[test]
fn digit_events_switch_rendered_mode() {
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);
    let mut params = VisualParameters::default();
    params.show_info = false;
    let mut feed = feed_with_tone();

    apply_event(InputEvent::Digit(2), &mut params, &mut feed);
    render_frame(&mut surface, &mut params, &mut feed);
    assert_eq!(params.mode, VizMode::Oscope);
    assert_eq!(surface.strokes(), 1);

    surface.clear();
    apply_event(InputEvent::Digit(3), &mut params, &mut feed);
    render_frame(&mut surface, &mut params, &mut feed);
    assert_eq!(params.mode, VizMode::Bars);
    assert!(surface.count(|op| matches!(op, DrawOp::FillRect { .. })) > 1);
}

#[test]
fn mute_event_keeps_visualization_moving() {
    let mut surface = RecordingSurface::new(WIDTH, HEIGHT);
    let mut params = VisualParameters::default();
    params.info = vec!["playing: tone.wav".into()];
    let mut feed = feed_with_tone();

    apply_event(InputEvent::ToggleMute, &mut params, &mut feed);
    feed.advance_playout(2048);
    render_frame(&mut surface, &mut params, &mut feed);

    assert!(!feed.output_connected());
    // the analyser link is intact: the tone still shapes the tree
    assert!(params.tree.total_branches > 0);
    assert!(surface.texts().contains(&"audio: muted"));
}
