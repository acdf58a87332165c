use canopy_core::VisualParameters;

use crate::surface::DrawSurface;

/// Scalar inputs for one tree pass, copied out of the shared
/// parameters so the recursion carries no other borrows. The tree
/// itself is never materialized: a branch exists only as the
/// (origin, length, angle, depth) tuple passed down the recursion,
/// and the whole structure is regenerated every frame.
#[derive(Debug, Clone, Copy)]
pub struct TreeContext {
    pub branch_factor: u32,
    /// Global rotation added to every branch, degrees.
    pub branch_angle: f32,
    /// Angular spread between siblings, degrees.
    pub angle_each: f32,
    /// Length multiplier applied at each recursion step.
    pub grow_factor: f32,
    /// Loudest mid-band byte this frame, floored at 1.
    pub mid_amplitude: f32,
    pub line_curve: bool,
    pub line_diff: bool,
    pub line_width: f32,
    pub show_labels: bool,
}

impl TreeContext {
    /// Snapshot the per-frame scalars from the shared parameters.
    pub fn from_params(params: &VisualParameters, mid_amplitude: u8) -> Self {
        Self {
            branch_factor: params.tree.branch_factor,
            branch_angle: params.tree.branch_angle,
            angle_each: params.tree.angle_each(),
            grow_factor: params.tree.grow_factor,
            mid_amplitude: mid_amplitude as f32,
            line_curve: params.line_curve,
            line_diff: params.line_diff,
            line_width: params.line_width,
            show_labels: params.show_labels,
        }
    }
}

/// Draw one branch and recurse into its children.
///
/// The endpoint hangs off the origin by `length` at `angle` degrees
/// (0 pointing up, positive turning the segment clockwise). Each step
/// scales the length by the grow factor and pulls it up by the
/// mid-band energy, so louder audio stretches the outer branches.
/// `total` counts every node visited this frame; the stroke of the
/// very first segment is skipped because it runs from the off-screen
/// recursion seed to the trunk and would draw an artifact line.
pub fn render_tree(
    surface: &mut impl DrawSurface,
    ctx: &TreeContext,
    x1: f32,
    y1: f32,
    length: f32,
    angle: f32,
    depth: u32,
    total: &mut u32,
) {
    if depth == 0 {
        return;
    }

    let x2 = x1 - length * angle.to_radians().sin();
    let y2 = y1 - length * angle.to_radians().cos();
    let x_mid = (x1 + x2) / 2.0;
    let y_mid = (y1 + y2) / 2.0;
    let next_length = ctx.grow_factor * length + 0.2 * ctx.mid_amplitude;
    let next_angle = angle + ctx.branch_angle;
    let child_depth = depth - 1;

    *total += 1;

    surface.save();
    if ctx.show_labels {
        surface.fill_text(
            &format!("{} ({},{})", total, x2.floor(), y2.floor()),
            x2 + 10.0,
            y2 + 10.0,
        );
    }
    surface.begin_path();
    surface.move_to(x1, y1);
    if ctx.line_diff {
        surface.set_line_width(child_depth as f32 * ctx.line_width);
    }
    if ctx.line_curve {
        // bow the segment toward the canvas center
        surface.quadratic_to(
            surface.width() / 2.0,
            surface.height() / 2.0,
            x_mid,
            y_mid,
        );
        surface.move_to(x_mid, y_mid);
        surface.line_to(x2, y2);
    } else {
        surface.line_to(x2, y2);
    }
    if *total > 1 {
        surface.stroke();
    }

    for i in 0..ctx.branch_factor {
        render_tree(
            surface,
            ctx,
            x2,
            y2,
            next_length,
            next_angle + ctx.angle_each * i as f32,
            child_depth,
            total,
        );
    }
    surface.restore();
}
