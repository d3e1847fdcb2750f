use crate::colors::Color;
use serde::Serialize;
use telemon_config::LabelAlign;

/// How a straight line is stroked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrokeStyle {
    pub color:     Color,
    pub thickness: f32,
    /// `[dash, gap]` lengths in pixels; `None` = solid.
    pub dash:      Option<[f32; 2]>,
}

/// Everything the chart renderer needs to know about appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub gridline: StrokeStyle,
    pub warning:  StrokeStyle,
    pub critical: StrokeStyle,
    /// Data polyline stroke width.
    pub polyline_thickness: f32,
    pub label_color: Color,
    pub font_size:   f32,
    pub label_align: LabelAlign,
    /// Horizontal distance between a label and the chart edge.
    pub label_inset: f32,
    /// Labels are lifted by this much so they sit centred on their line.
    pub label_lift:  f32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            gridline: StrokeStyle {
                color:     Color::GRAY,
                thickness: 0.5,
                dash:      Some([4.0, 2.0]),
            },
            warning: StrokeStyle {
                color:     Color::YELLOW,
                thickness: 1.0,
                dash:      Some([2.0, 2.0]),
            },
            critical: StrokeStyle {
                color:     Color::RED,
                thickness: 1.0,
                dash:      Some([2.0, 2.0]),
            },
            polyline_thickness: 2.0,
            label_color: Color::WHITE,
            font_size:   10.0,
            label_align: LabelAlign::Right,
            label_inset: 5.0,
            label_lift:  7.0,
        }
    }
}
