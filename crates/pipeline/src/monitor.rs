use crate::extract::extract;
use crate::metric::MetricId;
use crate::notify::Notifier;
use crate::pipeline::{ChartSettings, MetricPipeline, Outcome};
use std::collections::BTreeMap;
use telemon_config::TelemonConfig;
use telemon_core::{HardwareGroup, Result, SensorProvider};
use telemon_system::Catalogue;
use telemon_theme::Theme;
use tracing::{debug, info, warn};

pub const NOTIFY_SUMMARY: &str = "telemon";

/// Summary of one [`Monitor::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// The provider failed; no pipeline was fed.
    pub provider_failed: bool,
    pub rendered: Vec<MetricId>,
    pub skipped:  Vec<MetricId>,
    /// Metrics whose frame could not be presented.
    pub failed:   Vec<MetricId>,
}

/// Owns every metric pipeline and drives them from a sensor provider.
pub struct Monitor {
    pipelines: BTreeMap<MetricId, MetricPipeline>,
    catalogue: Catalogue,
    notifier:  Box<dyn Notifier>,
}

impl Monitor {
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self {
            pipelines: BTreeMap::new(),
            catalogue: Catalogue::default(),
            notifier,
        }
    }

    pub fn insert(&mut self, pipeline: MetricPipeline) {
        self.pipelines.insert(pipeline.id(), pipeline);
    }

    pub fn pipeline(&self, id: MetricId) -> Option<&MetricPipeline> {
        self.pipelines.get(&id)
    }

    pub fn pipelines(&self) -> impl Iterator<Item = &MetricPipeline> {
        self.pipelines.values()
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Poll the provider once and bind sensor roles to the sensors it reports.
    pub fn bind(&mut self, provider: &mut dyn SensorProvider) -> Result<()> {
        let groups = provider.poll()?;
        self.bind_groups(&groups);
        Ok(())
    }

    pub fn bind_groups(&mut self, groups: &[HardwareGroup]) {
        self.catalogue = Catalogue::bind(groups);
        self.catalogue.report();

        for id in self.pipelines.keys() {
            if !id.roles().iter().any(|r| self.catalogue.is_bound(*r)) {
                warn!(metric = %id, "no sensor available; chart stays empty");
            }
        }
        info!(
            charts = self.pipelines.len(),
            bound = telemon_system::SensorRole::ALL.len() - self.catalogue.missing().count(),
            "sensors bound"
        );
    }

    /// One sampling step: poll, extract, feed every pipeline.
    ///
    /// A provider error is sent to the notifier and leaves every pipeline
    /// untouched.
    pub fn tick(&mut self, provider: &mut dyn SensorProvider) -> TickReport {
        match provider.poll() {
            Ok(groups) => self.feed(&groups),
            Err(e) => {
                self.notifier.notify(NOTIFY_SUMMARY, &format!("Error updating hardware info: {e}"));
                TickReport {
                    provider_failed: true,
                    ..TickReport::default()
                }
            }
        }
    }

    /// Route one set of readings through the pipelines.
    pub fn feed(&mut self, groups: &[HardwareGroup]) -> TickReport {
        let selection = self.catalogue.select(groups);
        let mut report = TickReport::default();

        for (id, pipeline) in &mut self.pipelines {
            match pipeline.update(extract(*id, &selection)) {
                Ok(Outcome::Rendered(_)) => report.rendered.push(*id),
                Ok(Outcome::Skipped) => report.skipped.push(*id),
                Err(e) => {
                    warn!(metric = %id, "could not present chart: {e}");
                    report.failed.push(*id);
                }
            }
        }

        debug!(
            rendered = report.rendered.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "tick"
        );
        report
    }

    /// Re-apply colours, scales and style from a reloaded config.
    ///
    /// Charts enabled or disabled by the reload keep their current state
    /// until restart.
    pub fn apply_config(&mut self, config: &TelemonConfig, theme: &Theme) {
        for (id, pipeline) in &mut self.pipelines {
            match ChartSettings::from_config(*id, config, theme) {
                Some(settings) => pipeline.apply(settings),
                None => info!(metric = %id, "chart disabled; takes effect on restart"),
            }
        }
        info!("configuration applied");
    }
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("pipelines", &self.pipelines)
            .field("catalogue", &self.catalogue)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SharedTitle;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use telemon_chart::RecordingSurface;
    use telemon_config::ScaleChoice;
    use telemon_core::{HardwareKind, SensorKind, TelemonError};

    /// Provider that replays a fixed script of poll results.
    #[derive(Debug, Default)]
    struct Scripted {
        script: VecDeque<Result<Vec<HardwareGroup>>>,
    }

    impl Scripted {
        fn then(mut self, polled: Result<Vec<HardwareGroup>>) -> Self {
            self.script.push_back(polled);
            self
        }
    }

    impl SensorProvider for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn poll(&mut self) -> Result<Vec<HardwareGroup>> {
            self.script
                .pop_front()
                .unwrap_or_else(|| Err(TelemonError::Provider("script exhausted".into())))
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl Notifier for Recorder {
        fn notify(&self, _summary: &str, body: &str) {
            self.0.borrow_mut().push(body.to_string());
        }
    }

    fn hardware(gpu_load: Option<f32>) -> Vec<HardwareGroup> {
        let cpu = HardwareGroup::new(HardwareKind::Cpu, "Test CPU")
            .with_sensor("CPU Total", SensorKind::Load, 25.0)
            .with_sensor("CPU Package", SensorKind::Temperature, 72.5);
        let mut gpu = HardwareGroup::new(HardwareKind::Gpu, "Test GPU")
            .with_sensor("GPU Core", SensorKind::Temperature, 60.0)
            .with_sensor("GPU Memory Used", SensorKind::SmallData, 4_096.0)
            .with_sensor("GPU Memory Total", SensorKind::SmallData, 8_192.0);
        gpu.sensors.push(telemon_core::SensorReading::new("GPU Core", SensorKind::Load, gpu_load));
        vec![cpu, gpu]
    }

    fn monitor(notifier: Recorder) -> (Monitor, BTreeMap<MetricId, SharedTitle>) {
        let config = TelemonConfig::default();
        let theme = Theme::default();
        let mut monitor = Monitor::new(Box::new(notifier));
        let mut titles = BTreeMap::new();

        for id in MetricId::ALL {
            let Some(settings) = ChartSettings::from_config(id, &config, &theme) else {
                continue;
            };
            let title = SharedTitle::new();
            let surface = RecordingSurface::new(config.global.width, config.global.height);
            monitor.insert(MetricPipeline::new(id, settings, Box::new(surface), Box::new(title.clone())));
            titles.insert(id, title);
        }
        (monitor, titles)
    }

    #[test]
    fn gpu_memory_derived_from_used_and_total() {
        let (mut m, titles) = monitor(Recorder::default());
        let mut provider = Scripted::default().then(Ok(hardware(Some(10.0)))).then(Ok(hardware(None)));
        m.bind(&mut provider).unwrap();

        let report = m.tick(&mut provider);
        assert!(!report.provider_failed);
        assert_eq!(titles[&MetricId::GpuMemory].text(), "GPU Memory Usage - 50.0%");
        assert_eq!(titles[&MetricId::CpuTemperature].text(), "CPU Temperature - 72.5°C");
        assert!(report.rendered.contains(&MetricId::GpuMemory));
        assert!(report.skipped.contains(&MetricId::GpuLoad));
        assert!(report.skipped.contains(&MetricId::SystemMemory));
        assert_eq!(titles[&MetricId::GpuLoad].text(), "");
    }

    #[test]
    fn provider_failure_is_notified_and_loop_continues() {
        let recorder = Recorder::default();
        let (mut m, _) = monitor(recorder.clone());
        let mut provider = Scripted::default()
            .then(Ok(hardware(Some(10.0))))
            .then(Ok(hardware(Some(10.0))))
            .then(Err(TelemonError::Provider("sensor bus timeout".into())))
            .then(Ok(hardware(Some(20.0))));
        m.bind(&mut provider).unwrap();
        m.tick(&mut provider);

        let failed = m.tick(&mut provider);
        assert!(failed.provider_failed);
        assert_eq!(recorder.0.borrow().len(), 1);
        assert!(recorder.0.borrow()[0].starts_with("Error updating hardware info:"));
        assert_eq!(m.pipeline(MetricId::GpuLoad).unwrap().series().len(), 1);

        let next = m.tick(&mut provider);
        assert!(!next.provider_failed);
        assert_eq!(recorder.0.borrow().len(), 1);
        assert_eq!(
            m.pipeline(MetricId::GpuLoad).unwrap().series().values().collect::<Vec<_>>(),
            [10.0, 20.0]
        );
    }

    #[test]
    fn unbound_metrics_are_skipped() {
        let (mut m, _) = monitor(Recorder::default());
        m.bind_groups(&hardware(Some(10.0)));
        assert!(!m.catalogue().is_bound(telemon_system::SensorRole::CpuPower));

        let report = m.feed(&hardware(Some(10.0)));
        assert!(report.skipped.contains(&MetricId::CpuPower));
        assert!(m.pipeline(MetricId::CpuPower).unwrap().series().is_empty());
    }

    #[test]
    fn reload_changes_scale_in_place() {
        let (mut m, _) = monitor(Recorder::default());
        m.bind_groups(&hardware(Some(10.0)));
        m.feed(&hardware(Some(10.0)));

        let mut config = TelemonConfig::default();
        config.charts.cpu_temperature.scale = Some(ScaleChoice::FixedThreshold);
        config.charts.gpu_load.enabled = false;
        m.apply_config(&config, &Theme::default());

        let cpu_temp = m.pipeline(MetricId::CpuTemperature).unwrap();
        assert_eq!(cpu_temp.scale(), telemon_chart::ScaleStrategy::FixedThresholdRange);
        assert_eq!(cpu_temp.series().len(), 1);
        assert!(m.pipeline(MetricId::GpuLoad).is_some());
    }

    #[test]
    fn disabled_charts_get_no_pipeline() {
        let (m, _) = monitor(Recorder::default());
        assert!(m.pipeline(MetricId::CpuClock).is_none());
        assert_eq!(m.pipelines().count(), MetricId::ALL.len() - 1);
    }
}
