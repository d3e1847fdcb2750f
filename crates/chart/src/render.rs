use crate::scale::{AxisRange, GridMark};
use crate::scene::{ChartScene, Point, Primitive, Severity};
use telemon_config::LabelAlign;
use telemon_core::{MetricKind, RollingSeries};
use telemon_theme::{ChartStyle, Color};

/// Temperature at which the warning line is drawn (°C).
pub const WARNING_TEMPERATURE: f32 = 80.0;
/// Temperature at which the critical line is drawn (°C).
pub const CRITICAL_TEMPERATURE: f32 = 90.0;

/// Horizontal marker drawn across the chart at a fixed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub value:    f32,
    pub severity: Severity,
}

/// Turns a series and its axis into a [`ChartScene`].
///
/// Rendering is stateless: the same inputs always produce the same scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRenderer {
    style:      ChartStyle,
    thresholds: Vec<Threshold>,
}

impl ChartRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self {
            style,
            thresholds: Vec::new(),
        }
    }

    /// Renderer with the overlays that belong to `kind` (temperature charts
    /// get the warning and critical lines).
    pub fn for_kind(kind: MetricKind, style: ChartStyle) -> Self {
        let renderer = Self::new(style);
        match kind {
            MetricKind::Temperature => renderer.with_thresholds([
                Threshold { value: WARNING_TEMPERATURE, severity: Severity::Warning },
                Threshold { value: CRITICAL_TEMPERATURE, severity: Severity::Critical },
            ]),
            _ => renderer,
        }
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: impl IntoIterator<Item = Threshold>) -> Self {
        self.thresholds = thresholds.into_iter().collect();
        self
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: ChartStyle) {
        self.style = style;
    }

    /// Lay out one frame.
    ///
    /// Sample `i` sits at `x = i * width / (capacity - 1)`, so a series that
    /// has not filled up yet is drawn against the left edge.  Values are
    /// clamped into the axis before being mapped to `y`.  NaN samples leave a
    /// gap in the x sequence and are not plotted.
    pub fn render(
        &self,
        series: &RollingSeries,
        range: &AxisRange,
        gridlines: &[GridMark],
        width: f32,
        height: f32,
        line_color: Color,
    ) -> ChartScene {
        if series.len() < 2 {
            return ChartScene::empty(width, height);
        }

        let x_step = width / (series.capacity() - 1) as f32;
        let points: Vec<Point> = series
            .values()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .map(|(i, v)| Point::new(i as f32 * x_step, value_to_y(v, range, height)))
            .collect();

        let mut primitives = Vec::with_capacity(2 + gridlines.len() * 2 + self.thresholds.len());
        primitives.push(Primitive::Polyline {
            points,
            color: line_color,
            thickness: self.style.polyline_thickness,
        });

        let label_x = match self.style.label_align {
            LabelAlign::Right => width - self.style.label_inset,
            LabelAlign::Left  => self.style.label_inset,
        };

        for mark in gridlines {
            let y = value_to_y(mark.value, range, height);
            primitives.push(Primitive::GridLine {
                y,
                value: mark.value,
                stroke: self.style.gridline,
            });
            primitives.push(Primitive::Label {
                text:      mark.label.clone(),
                x:         label_x,
                y:         y - self.style.label_lift,
                align:     self.style.label_align,
                color:     self.style.label_color,
                font_size: self.style.font_size,
            });
        }

        for threshold in self.thresholds.iter().filter(|t| range.contains(t.value)) {
            let stroke = match threshold.severity {
                Severity::Warning  => self.style.warning,
                Severity::Critical => self.style.critical,
            };
            primitives.push(Primitive::ThresholdLine {
                y: value_to_y(threshold.value, range, height),
                value: threshold.value,
                severity: threshold.severity,
                stroke,
            });
        }

        ChartScene {
            width,
            height,
            primitives,
        }
    }
}

/// Map a value onto the surface's vertical axis (higher values → smaller y).
///
/// A zero-width (or inverted) axis collapses to a flat line at mid-height.
pub fn value_to_y(value: f32, range: &AxisRange, height: f32) -> f32 {
    let span = range.span();
    if !(span > 0.0 && span.is_finite()) {
        return height / 2.0;
    }
    let clamped = value.max(range.min).min(range.max);
    height - (clamped - range.min) / span * height
}
