use canopy_audio::AudioFeed;
use canopy_core::{VisualParameters, VizMode};

use crate::surface::{DrawSurface, TextBaseline};
use crate::tree::{render_tree, TreeContext};

/// Left/top offset of the overlay text block, pixels.
const OVERLAY_X: f32 = 24.0;
const OVERLAY_Y: f32 = 28.0;

/// Per-frame advance of the dash-width breathing accumulator.
const DASH_SPEED_STEP: f32 = 0.001;
/// Per-frame advance of the grow-factor breathing accumulator.
const GROW_SPEED_STEP: f32 = 0.001;
/// Per-frame rotation drift of the spiral, radians.
const SPIRAL_DRIFT: f32 = 0.002;
/// Per-point rotation step of the spiral, radians.
const SPIRAL_STEP: f32 = 0.05;

/// Render one frame: refresh the audio buffers, apply the global draw
/// state, advance the continuous oscillators, dispatch on the active
/// mode, and draw the overlay.
///
/// Missing audio buffers are a normal state, not an error: the
/// audio-driven modes simply draw nothing until a source attaches, and
/// the overlay keeps working.
pub fn render_frame(
    surface: &mut impl DrawSurface,
    params: &mut VisualParameters,
    feed: &mut AudioFeed,
) {
    feed.refresh();

    surface.set_composite_mode(params.composite);
    if params.clear_frames {
        surface.set_fill_color(params.background);
        surface.fill_rect(0.0, 0.0, surface.width(), surface.height());
    }
    surface.set_font_size(params.font_size);
    surface.set_line_width(params.line_width);
    surface.set_stroke_color(params.foreground);
    params.line_dash_speed += DASH_SPEED_STEP;
    surface.set_line_dash(params.line_dash_width);

    params.tree.zoom.advance();

    match params.mode {
        VizMode::Help => {
            let lines = params.default_info.clone();
            render_text_block(surface, params, &lines, feed.is_muted());
        }
        VizMode::Tree => {
            render_tree_frame(surface, params, feed);
            render_overlay(surface, params, feed);
        }
        VizMode::Oscope => {
            render_oscilloscope(surface, feed);
            render_overlay(surface, params, feed);
        }
        VizMode::Bars => {
            render_bars(surface, params, feed);
            render_overlay(surface, params, feed);
        }
        VizMode::Spiral => {
            render_spiral(surface, params, feed);
            render_overlay(surface, params, feed);
        }
    }
}

fn render_tree_frame(
    surface: &mut impl DrawSurface,
    params: &mut VisualParameters,
    feed: &AudioFeed,
) {
    // drift continues even while no audio is attached
    params.tree.total_branches = 0;
    params.tree.branch_angle += params.tree.rotation_speed / 100.0;
    params.tree.grow_speed += GROW_SPEED_STEP;
    params.tree.grow_factor = params.tree.grow_speed.sin().abs() * 1.5;

    if feed.wave_data().is_none() {
        return;
    }

    let ctx = TreeContext::from_params(params, feed.bands().max_mid_amplitude());
    let zoom = params.tree.zoom.value;
    let center_x = surface.width() / 2.0;
    let center_y = surface.height() / 2.0;

    let mut total = 0;
    render_tree(
        surface,
        &ctx,
        center_x,
        center_y + zoom,
        zoom,
        0.0,
        params.tree.depth,
        &mut total,
    );
    params.tree.total_branches = total;
}

fn render_oscilloscope(surface: &mut impl DrawSurface, feed: &AudioFeed) {
    let Some(wave) = feed.wave_data() else {
        return;
    };
    surface.save();
    surface.begin_path();
    let slice_width = surface.width() / wave.len() as f32;
    let mut x = 0.0;
    for (i, &byte) in wave.iter().enumerate() {
        let v = byte as f32 / 128.0;
        let y = v * surface.height() / 2.0;
        if i == 0 {
            surface.move_to(x, y);
        } else {
            surface.line_to(x, y);
        }
        x += slice_width;
    }
    surface.line_to(surface.width(), surface.height() / 2.0);
    surface.stroke();
    surface.restore();
}

fn render_bars(surface: &mut impl DrawSurface, params: &VisualParameters, feed: &AudioFeed) {
    let Some(freq) = feed.freq_data() else {
        return;
    };
    surface.save();
    surface.set_fill_color(params.foreground);
    let bar_width = surface.width() / freq.len() as f32 + params.bars.width;
    let mut x = 0.0;
    for &byte in freq {
        let bar_height = byte as f32 * params.bars.height;
        surface.fill_rect(x, surface.height() - bar_height, bar_width, bar_height);
        x += bar_width + params.bars.gap;
    }
    surface.restore();
}

fn render_spiral(surface: &mut impl DrawSurface, params: &mut VisualParameters, feed: &AudioFeed) {
    let Some(wave) = feed.wave_data() else {
        return;
    };
    params.spiral.angle += SPIRAL_DRIFT;

    surface.save();
    surface.set_fill_color(params.foreground);
    let center_x = surface.width() / 2.0;
    let center_y = surface.height() / 2.0;
    let n = wave.len() as f32;
    let mut theta = params.spiral.angle;
    for (i, &byte) in wave.iter().enumerate() {
        theta += SPIRAL_STEP;
        // silence sits at v = 1.0, so the quiet spiral is a steady coil
        let v = byte as f32 / 128.0;
        let radius = (i as f32 / n) * params.spiral.zoom_level * v;
        let x = center_x + radius * theta.sin();
        let y = center_y - radius * theta.cos();
        surface.fill_rect(x, y, 1.0, 1.0);
    }
    surface.restore();
}

/// The diagnostic overlay for the non-help modes.
fn render_overlay(surface: &mut impl DrawSurface, params: &VisualParameters, feed: &AudioFeed) {
    if !params.show_info {
        return;
    }
    let mut info = params.info.clone();
    if params.show_data {
        match params.mode {
            VizMode::Tree => {
                info.push(format!("total branches: {}", params.tree.total_branches));
                info.push(format!("tree depth: {}", params.tree.depth));
                info.push(format!("branch factor: {}", params.tree.branch_factor));
                info.push(format!("branch angle: {:.2}", params.tree.branch_angle));
                info.push(format!("grow factor: {:.2}", params.tree.grow_factor));
                info.push(format!("zoom level: {:.2}", params.tree.zoom.value));
                info.push(format!("linewidth: {}", params.line_width));
            }
            VizMode::Oscope => {
                info.push(format!("linewidth: {:.2}", params.line_width));
                info.push(format!("dashwidth: {:.2}", params.line_dash_width));
            }
            VizMode::Bars => {
                info.push(format!("bar width: {:.2}", params.bars.width));
                info.push(format!("bar height: {:.2}", params.bars.height));
            }
            VizMode::Spiral => {
                info.push(format!("spiral zoom: {:.2}", params.spiral.zoom_level));
                info.push(format!("spiral angle: {:.2}", params.spiral.angle));
            }
            VizMode::Help => {}
        }
        info.push(format!("background: {}", params.background.to_css()));
        info.push(format!("foreground: {}", params.foreground.to_css()));
        info.push(format!("fps: {}", params.fps));
    }
    render_text_block(surface, params, &info, feed.is_muted());
}

/// Draw a block of overlay lines, splicing the mute notice after the
/// first line.
fn render_text_block(
    surface: &mut impl DrawSurface,
    params: &VisualParameters,
    lines: &[String],
    muted: bool,
) {
    let mut lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    if muted {
        let at = lines.len().min(1);
        lines.insert(at, "audio: muted");
    }

    surface.save();
    surface.set_text_baseline(TextBaseline::Middle);
    surface.set_fill_color(params.foreground);
    let line_height = params.overlay_line_height();
    for (lineno, line) in lines.iter().enumerate() {
        surface.fill_text(line, OVERLAY_X, OVERLAY_Y + lineno as f32 * line_height);
    }
    surface.restore();
}
