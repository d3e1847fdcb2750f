use crate::surface::DrawingSurface;
use serde::Serialize;
use telemon_config::LabelAlign;
use telemon_theme::{Color, StrokeStyle};

/// Position in surface pixels (origin top-left, `y` down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

/// A single drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Polyline {
        points:    Vec<Point>,
        color:     Color,
        thickness: f32,
    },
    GridLine {
        y:      f32,
        value:  f32,
        stroke: StrokeStyle,
    },
    ThresholdLine {
        y:        f32,
        value:    f32,
        severity: Severity,
        stroke:   StrokeStyle,
    },
    Label {
        text:      String,
        x:         f32,
        y:         f32,
        align:     LabelAlign,
        color:     Color,
        font_size: f32,
    },
}

/// Everything one chart frame consists of.  Built fresh every tick and
/// thrown away after it has been drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartScene {
    pub width:      f32,
    pub height:     f32,
    pub primitives: Vec<Primitive>,
}

impl ChartScene {
    pub fn empty(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            primitives: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn polyline(&self) -> Option<&[Point]> {
        self.primitives.iter().find_map(|p| match p {
            Primitive::Polyline { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }

    /// `(value, y)` of every gridline, in drawing order.
    pub fn gridlines(&self) -> Vec<(f32, f32)> {
        self.primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::GridLine { value, y, .. } => Some((*value, *y)),
                _ => None,
            })
            .collect()
    }

    pub fn thresholds(&self) -> Vec<(Severity, f32)> {
        self.primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::ThresholdLine { severity, value, .. } => Some((*severity, *value)),
                _ => None,
            })
            .collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Clear `surface` and replay every primitive onto it.
    pub fn draw_onto(&self, surface: &mut dyn DrawingSurface) {
        surface.clear();
        for primitive in &self.primitives {
            match primitive {
                Primitive::Polyline { points, color, thickness } => {
                    surface.add_polyline(points, *color, *thickness);
                }
                Primitive::GridLine { y, stroke, .. } | Primitive::ThresholdLine { y, stroke, .. } => {
                    surface.add_line(
                        Point::new(0.0, *y),
                        Point::new(self.width, *y),
                        stroke.color,
                        stroke.thickness,
                        stroke.dash,
                    );
                }
                Primitive::Label { text, x, y, align, color, font_size } => {
                    surface.add_label(text, *x, *y, *align, *color, *font_size);
                }
            }
        }
    }
}
