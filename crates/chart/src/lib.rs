//! Chart engine: axis scaling, scene layout and the drawing-surface seam.
//!
//! - [`scale`]:   [`ScaleStrategy`] → [`AxisRange`] + [`GridMark`]s
//! - [`render`]:  [`ChartRenderer`] lays a series out as a [`ChartScene`]
//! - [`surface`]: [`DrawingSurface`] the scene is replayed onto

pub mod render;
pub mod scale;
pub mod scene;
pub mod surface;

pub use render::{ChartRenderer, Threshold, CRITICAL_TEMPERATURE, WARNING_TEMPERATURE};
pub use scale::{AxisRange, GridMark, ScaleStrategy, StepTable};
pub use scene::{ChartScene, Point, Primitive, Severity};
pub use surface::{DrawOp, DrawingSurface, RecordingSurface};

#[cfg(test)]
mod tests {
    use super::*;
    use telemon_core::{MetricKind, RollingSeries};
    use telemon_theme::{ChartStyle, Color};

    #[test]
    fn scene_replays_onto_surface_after_clear() {
        let mut series = RollingSeries::new(60);
        series.extend([40.0, 45.0, 50.0, 85.0, 90.0]);

        let strategy = ScaleStrategy::temperature();
        let range = strategy.compute_range(&series);
        let marks = strategy.gridlines(&range, MetricKind::Temperature.unit());
        let scene = ChartRenderer::for_kind(MetricKind::Temperature, ChartStyle::default())
            .render(&series, &range, &marks, 300.0, 100.0, Color::CRIMSON);

        let mut surface = RecordingSurface::new(300.0, 100.0);
        scene.draw_onto(&mut surface);
        scene.draw_onto(&mut surface);

        // polyline + 4 gridlines + 4 labels + 2 thresholds, not doubled
        assert_eq!(surface.clears(), 2);
        assert_eq!(surface.ops().len(), 11);
        assert!(matches!(surface.ops()[0], DrawOp::Polyline { color, .. } if color == Color::CRIMSON));
        assert_eq!(surface.labels().collect::<Vec<_>>(), ["40°C", "60°C", "80°C", "100°C"]);

        let spans_width = surface.ops().iter().all(|op| match op {
            DrawOp::Line { from, to, .. } => from.x == 0.0 && to.x == 300.0 && from.y == to.y,
            _ => true,
        });
        assert!(spans_width);
    }
}
