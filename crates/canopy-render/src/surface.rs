use canopy_core::{CompositeMode, Rgba};

/// Vertical anchor for text drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Middle,
    Top,
}

/// The immediate-mode 2D drawing capability the platform provides.
///
/// This is the whole canvas contract the render pipeline needs: path
/// building, stroke/fill state, rectangles, text, and a style stack.
/// Coordinates are in pixels with the origin at the top-left.
pub trait DrawSurface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn set_composite_mode(&mut self, mode: CompositeMode);
    fn set_stroke_color(&mut self, color: Rgba);
    fn set_fill_color(&mut self, color: Rgba);
    fn set_line_width(&mut self, width: f32);
    /// A dash length of zero means a solid line.
    fn set_line_dash(&mut self, dash: f32);
    fn set_font_size(&mut self, size: f32);
    fn set_text_baseline(&mut self, baseline: TextBaseline);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn quadratic_to(&mut self, cx: f32, cy: f32, x: f32, y: f32);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_text(&mut self, text: &str, x: f32, y: f32);

    /// Push the current draw style onto the style stack.
    fn save(&mut self);
    /// Pop the style stack.
    fn restore(&mut self);
}

/// One recorded draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    SetCompositeMode(CompositeMode),
    SetStrokeColor(Rgba),
    SetFillColor(Rgba),
    SetLineWidth(f32),
    SetLineDash(f32),
    SetFontSize(f32),
    SetTextBaseline(TextBaseline),
    BeginPath,
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadraticTo { cx: f32, cy: f32, x: f32, y: f32 },
    Stroke,
    FillRect { x: f32, y: f32, w: f32, h: f32 },
    FillText { text: String, x: f32, y: f32 },
    Save,
    Restore,
}

/// A surface that records every command instead of drawing.
///
/// Used by the test suites and benches to assert on the emitted
/// geometry without a real canvas behind them.
pub struct RecordingSurface {
    width: f32,
    height: f32,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    pub fn strokes(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::Stroke))
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// True when every recorded coordinate is a finite number.
    pub fn all_coords_finite(&self) -> bool {
        self.ops.iter().all(|op| match *op {
            DrawOp::MoveTo(x, y) | DrawOp::LineTo(x, y) => x.is_finite() && y.is_finite(),
            DrawOp::QuadraticTo { cx, cy, x, y } => {
                cx.is_finite() && cy.is_finite() && x.is_finite() && y.is_finite()
            }
            DrawOp::FillRect { x, y, w, h } => {
                x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite()
            }
            DrawOp::FillText { x, y, .. } => x.is_finite() && y.is_finite(),
            _ => true,
        })
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.ops.push(DrawOp::SetCompositeMode(mode));
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.ops.push(DrawOp::SetStrokeColor(color));
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.ops.push(DrawOp::SetFillColor(color));
    }

    fn set_line_width(&mut self, width: f32) {
        self.ops.push(DrawOp::SetLineWidth(width));
    }

    fn set_line_dash(&mut self, dash: f32) {
        self.ops.push(DrawOp::SetLineDash(dash));
    }

    fn set_font_size(&mut self, size: f32) {
        self.ops.push(DrawOp::SetFontSize(size));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.ops.push(DrawOp::SetTextBaseline(baseline));
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::LineTo(x, y));
    }

    fn quadratic_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.ops.push(DrawOp::QuadraticTo { cx, cy, x, y });
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ops.push(DrawOp::FillRect { x, y, w, h });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }
}
