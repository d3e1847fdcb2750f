use crate::scene::Point;
use serde::Serialize;
use telemon_config::LabelAlign;
use telemon_core::Result;
use telemon_theme::Color;

/// Abstract canvas a chart is drawn onto.
///
/// Coordinates are surface pixels with the origin at the top-left corner and
/// `y` growing downward.
pub trait DrawingSurface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Remove everything drawn so far.
    fn clear(&mut self);

    fn add_polyline(&mut self, points: &[Point], color: Color, thickness: f32);

    /// Straight segment; `dash` is `[dash, gap]` or `None` for solid.
    fn add_line(&mut self, from: Point, to: Point, color: Color, thickness: f32, dash: Option<[f32; 2]>);

    /// Text whose top edge sits at `y`.  `x` is the left edge for
    /// [`LabelAlign::Left`] and the right edge for [`LabelAlign::Right`].
    fn add_label(&mut self, text: &str, x: f32, y: f32, align: LabelAlign, color: Color, font_size: f32);

    /// Flush the frame to wherever the surface displays it.
    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}

/// One call recorded by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Polyline {
        points:    Vec<Point>,
        color:     Color,
        thickness: f32,
    },
    Line {
        from:      Point,
        to:        Point,
        color:     Color,
        thickness: f32,
        dash:      Option<[f32; 2]>,
    },
    Label {
        text:  String,
        x:     f32,
        y:     f32,
        align: LabelAlign,
        color: Color,
        font_size: f32,
    },
}

/// In-memory surface that keeps the primitives of the current frame.
///
/// Used in tests and as the headless target when no output is configured.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width:  f32,
    height: f32,
    ops:    Vec<DrawOp>,
    clears:   usize,
    presents: usize,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Primitives drawn since the last `clear`.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn presents(&self) -> usize {
        self.presents
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Label { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl DrawingSurface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.clears += 1;
    }

    fn add_polyline(&mut self, points: &[Point], color: Color, thickness: f32) {
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            color,
            thickness,
        });
    }

    fn add_line(&mut self, from: Point, to: Point, color: Color, thickness: f32, dash: Option<[f32; 2]>) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color,
            thickness,
            dash,
        });
    }

    fn add_label(&mut self, text: &str, x: f32, y: f32, align: LabelAlign, color: Color, font_size: f32) {
        self.ops.push(DrawOp::Label {
            text: text.to_string(),
            x,
            y,
            align,
            color,
            font_size,
        });
    }

    fn present(&mut self) -> Result<()> {
        self.presents += 1;
        Ok(())
    }
}
