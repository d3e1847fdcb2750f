use crate::metric::MetricId;
use std::cell::RefCell;
use std::rc::Rc;
use telemon_chart::{AxisRange, ChartRenderer, DrawingSurface, ScaleStrategy};
use telemon_config::TelemonConfig;
use telemon_core::{Result, RollingSeries};
use telemon_theme::{ChartStyle, Color, Theme};
use tracing::{debug, warn};

/// Text label showing a chart's title and latest value.
pub trait TitleLabel {
    fn set_text(&mut self, text: &str);
}

/// Title label whose text can be read back from elsewhere (e.g. by a file
/// surface that embeds the title in its output).
#[derive(Debug, Clone, Default)]
pub struct SharedTitle(Rc<RefCell<String>>);

impl SharedTitle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.0.borrow().clone()
    }
}

impl TitleLabel for SharedTitle {
    fn set_text(&mut self, text: &str) {
        let mut current = self.0.borrow_mut();
        current.clear();
        current.push_str(text);
    }
}

/// Everything about a pipeline that comes from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    pub capacity:   usize,
    pub scale:      ScaleStrategy,
    pub line_color: Color,
    pub style:      ChartStyle,
}

impl ChartSettings {
    /// Settings for `id`, or `None` when its chart is disabled.
    pub fn from_config(id: MetricId, config: &TelemonConfig, theme: &Theme) -> Option<Self> {
        let chart = config.charts.get(id.key())?;
        if !chart.enabled {
            return None;
        }

        let kind = id.kind();
        let scale = match chart.scale {
            Some(choice) => ScaleStrategy::from_choice(choice, kind, theme.percent_labels),
            None => ScaleStrategy::for_kind(kind, theme.percent_labels),
        };

        let line_color = match chart.color.as_deref() {
            None => id.default_color(),
            Some(hex) => Color::from_hex(hex).unwrap_or_else(|| {
                warn!(metric = %id, color = hex, "invalid chart color; using default");
                id.default_color()
            }),
        };

        Some(Self {
            capacity: config.global.history,
            scale,
            line_color,
            style: theme.chart.clone(),
        })
    }
}

/// What one [`MetricPipeline::update`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// No reading this tick; nothing changed.
    Skipped,
    /// Sample pushed and the chart redrawn against this axis.
    Rendered(AxisRange),
}

/// One metric's series, axis policy, renderer and output targets.
pub struct MetricPipeline {
    id:         MetricId,
    series:     RollingSeries,
    scale:      ScaleStrategy,
    renderer:   ChartRenderer,
    line_color: Color,
    surface:    Box<dyn DrawingSurface>,
    title:      Box<dyn TitleLabel>,
}

impl MetricPipeline {
    pub fn new(
        id: MetricId,
        settings: ChartSettings,
        surface: Box<dyn DrawingSurface>,
        title: Box<dyn TitleLabel>,
    ) -> Self {
        Self {
            id,
            series: RollingSeries::new(settings.capacity),
            scale: settings.scale,
            renderer: ChartRenderer::for_kind(id.kind(), settings.style),
            line_color: settings.line_color,
            surface,
            title,
        }
    }

    pub fn id(&self) -> MetricId {
        self.id
    }

    pub fn series(&self) -> &RollingSeries {
        &self.series
    }

    pub fn scale(&self) -> ScaleStrategy {
        self.scale
    }

    pub fn line_color(&self) -> Color {
        self.line_color
    }

    /// Feed one tick's reading.
    ///
    /// With a value: push, rescale, redraw the surface, retitle, present.
    /// Without one nothing is touched.  The returned error only concerns
    /// presenting the frame; the sample has been recorded either way.
    pub fn update(&mut self, reading: Option<f32>) -> Result<Outcome> {
        let Some(value) = reading else {
            debug!(metric = %self.id, "no reading");
            return Ok(Outcome::Skipped);
        };

        self.series.push(value);

        let range = self.scale.compute_range(&self.series);
        let marks = self.scale.gridlines(&range, self.id.kind().unit());
        let (width, height) = (self.surface.width(), self.surface.height());
        let scene = self
            .renderer
            .render(&self.series, &range, &marks, width, height, self.line_color);

        scene.draw_onto(self.surface.as_mut());
        self.title.set_text(&self.id.format_title(value));
        self.surface.present()?;

        Ok(Outcome::Rendered(range))
    }

    /// Apply new colours, scale and style.  History is kept; a changed
    /// capacity only takes effect on restart.
    pub fn apply(&mut self, settings: ChartSettings) {
        if settings.capacity != self.series.capacity() {
            debug!(metric = %self.id, capacity = settings.capacity, "history size change needs a restart");
        }
        self.scale = settings.scale;
        self.line_color = settings.line_color;
        self.renderer.set_style(settings.style);
    }
}

impl std::fmt::Debug for MetricPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricPipeline")
            .field("id", &self.id)
            .field("samples", &self.series.len())
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telemon_chart::{DrawOp, RecordingSurface};
    use telemon_config::ScaleChoice;
    use telemon_core::TelemonError;

    /// Surface handle the test keeps a second reference to.
    #[derive(Clone)]
    struct Shared(Rc<RefCell<RecordingSurface>>);

    impl DrawingSurface for Shared {
        fn width(&self) -> f32 {
            self.0.borrow().width()
        }
        fn height(&self) -> f32 {
            self.0.borrow().height()
        }
        fn clear(&mut self) {
            self.0.borrow_mut().clear();
        }
        fn add_polyline(&mut self, points: &[telemon_chart::Point], color: Color, thickness: f32) {
            self.0.borrow_mut().add_polyline(points, color, thickness);
        }
        fn add_line(
            &mut self,
            from: telemon_chart::Point,
            to: telemon_chart::Point,
            color: Color,
            thickness: f32,
            dash: Option<[f32; 2]>,
        ) {
            self.0.borrow_mut().add_line(from, to, color, thickness, dash);
        }
        fn add_label(
            &mut self,
            text: &str,
            x: f32,
            y: f32,
            align: telemon_config::LabelAlign,
            color: Color,
            font_size: f32,
        ) {
            self.0.borrow_mut().add_label(text, x, y, align, color, font_size);
        }
        fn present(&mut self) -> Result<()> {
            self.0.borrow_mut().present()
        }
    }

    struct Failing;

    impl DrawingSurface for Failing {
        fn width(&self) -> f32 {
            300.0
        }
        fn height(&self) -> f32 {
            100.0
        }
        fn clear(&mut self) {}
        fn add_polyline(&mut self, _: &[telemon_chart::Point], _: Color, _: f32) {}
        fn add_line(&mut self, _: telemon_chart::Point, _: telemon_chart::Point, _: Color, _: f32, _: Option<[f32; 2]>) {}
        fn add_label(&mut self, _: &str, _: f32, _: f32, _: telemon_config::LabelAlign, _: Color, _: f32) {}
        fn present(&mut self) -> Result<()> {
            Err(TelemonError::Surface("disk full".into()))
        }
    }

    fn settings(id: MetricId) -> ChartSettings {
        ChartSettings::from_config(id, &TelemonConfig::default(), &Theme::default()).unwrap()
    }

    fn pipeline(id: MetricId) -> (MetricPipeline, Shared, SharedTitle) {
        let surface = Shared(Rc::new(RefCell::new(RecordingSurface::new(300.0, 100.0))));
        let title = SharedTitle::new();
        let p = MetricPipeline::new(id, settings(id), Box::new(surface.clone()), Box::new(title.clone()));
        (p, surface, title)
    }

    #[test]
    fn reading_is_pushed_rendered_and_titled() {
        let (mut p, surface, title) = pipeline(MetricId::CpuTemperature);
        for t in [40.0, 45.0, 50.0, 85.0, 90.0] {
            p.update(Some(t)).unwrap();
        }

        let Outcome::Rendered(range) = p.update(Some(72.5)).unwrap() else {
            panic!("expected a rendered frame");
        };
        assert!(range.contains(72.5));
        assert_eq!(title.text(), "CPU Temperature - 72.5°C");
        assert_eq!(p.series().len(), 6);

        let surface = surface.0.borrow();
        assert_eq!(surface.presents(), 6);
        assert!(matches!(surface.ops()[0], DrawOp::Polyline { color, .. } if color == Color::ORANGE_RED));
    }

    #[test]
    fn absent_reading_leaves_everything_untouched() {
        let (mut p, surface, title) = pipeline(MetricId::CpuLoad);
        p.update(Some(10.0)).unwrap();
        p.update(Some(20.0)).unwrap();
        let ops_before = surface.0.borrow().ops().to_vec();

        assert_eq!(p.update(None).unwrap(), Outcome::Skipped);
        assert_eq!(p.series().values().collect::<Vec<_>>(), [10.0, 20.0]);
        assert_eq!(title.text(), "CPU Load - 20.0%");
        assert_eq!(surface.0.borrow().ops(), ops_before.as_slice());
        assert_eq!(surface.0.borrow().clears(), 2);
    }

    #[test]
    fn history_is_bounded_by_capacity() {
        let (mut p, _, _) = pipeline(MetricId::CpuPower);
        for _ in 0..65 {
            p.update(Some(50.0)).unwrap();
        }
        assert_eq!(p.series().len(), 60);
        assert!(p.series().values().all(|v| v == 50.0));
    }

    #[test]
    fn present_failure_is_reported_after_recording() {
        let mut p = MetricPipeline::new(
            MetricId::GpuPower,
            settings(MetricId::GpuPower),
            Box::new(Failing),
            Box::new(SharedTitle::new()),
        );
        assert!(matches!(p.update(Some(120.0)), Err(TelemonError::Surface(_))));
        assert_eq!(p.series().latest(), Some(120.0));
    }

    #[test]
    fn apply_keeps_history() {
        let (mut p, _, _) = pipeline(MetricId::CpuTemperature);
        p.update(Some(60.0)).unwrap();

        let mut config = TelemonConfig::default();
        config.charts.cpu_temperature.scale = Some(ScaleChoice::FixedThreshold);
        config.charts.cpu_temperature.color = Some("#00ff00".into());
        config.global.history = 10;
        let next = ChartSettings::from_config(MetricId::CpuTemperature, &config, &Theme::default()).unwrap();
        p.apply(next);

        assert_eq!(p.scale(), ScaleStrategy::FixedThresholdRange);
        assert_eq!(p.line_color(), Color::rgb8(0, 255, 0));
        assert_eq!(p.series().capacity(), 60);
        assert_eq!(p.series().latest(), Some(60.0));
    }

    #[test]
    fn disabled_chart_has_no_settings() {
        let config = TelemonConfig::default();
        assert!(ChartSettings::from_config(MetricId::CpuClock, &config, &Theme::default()).is_none());
    }

    #[test]
    fn bad_color_falls_back_to_metric_default() {
        let mut config = TelemonConfig::default();
        config.charts.gpu_load.color = Some("orange-ish".into());
        let s = ChartSettings::from_config(MetricId::GpuLoad, &config, &Theme::default()).unwrap();
        assert_eq!(s.line_color, Color::ORANGE);
    }
}
