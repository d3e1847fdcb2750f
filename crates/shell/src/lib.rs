//! Headless shell for `telemon`.
//!
//! Owns the tick loop and wires the engine to the outside world:
//! - `sysinfo`/sysfs sensor provider (opened once, closed once)
//! - one file-backed or in-memory surface per chart
//! - desktop notifications for non-fatal errors
//! - config file watcher (live reload on change)

pub mod notify;
pub mod surface;
mod svg;

pub use notify::DesktopNotifier;
pub use surface::{FileSurface, Frame};

use std::path::{Path, PathBuf};
use std::time::Duration;
use telemon_chart::{DrawingSurface, RecordingSurface};
use telemon_config::{load as load_config, ConfigWatcher, NotificationMode, TelemonConfig};
use telemon_core::{Message, ProviderSession, Result};
use telemon_pipeline::{ChartSettings, LogNotifier, MetricId, MetricPipeline, Monitor, Notifier, SharedTitle};
use telemon_system::SysinfoProvider;
use telemon_theme::Theme;
use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::time::{interval, interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{info, warn};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Run the monitor until Ctrl-C or SIGTERM.  Fails only if the config is invalid or the
/// sensor provider cannot be opened.
pub fn run(config_path: PathBuf) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_loop(config_path))
}

async fn run_loop(config_path: PathBuf) -> Result<()> {
    let config = load_config(&config_path)?;
    let theme = Theme::from_config(&config.theme);

    let notifier = build_notifier(config.global.notifications).await;
    let mut monitor = build_monitor(&config, &theme, notifier)?;

    let mut session = ProviderSession::open(SysinfoProvider::new())?;
    monitor.bind(session.provider_mut())?;

    let (_watcher, mut reloads) = ConfigWatcher::spawn(&config_path);
    let mut cadence = Cadence::new(config.global.interval_ms);
    let mut shutdown = ShutdownSignals::install()?;

    info!(
        charts = monitor.pipelines().count(),
        interval_ms = config.global.interval_ms,
        "telemon running"
    );

    loop {
        let message = tokio::select! {
            _ = cadence.tick() => Message::Tick,
            Some(()) = reloads.recv() => Message::ConfigReloaded,
            name = shutdown.recv() => {
                info!(signal = name, "shutdown requested");
                Message::Shutdown
            }
        };

        match message {
            Message::Tick => {
                monitor.tick(session.provider_mut());
            }
            Message::ConfigReloaded => {
                if let Some(interval_ms) = reload(&config_path, &mut monitor) {
                    if cadence.set_interval(interval_ms) {
                        info!(interval_ms, "tick interval changed");
                    }
                }
            }
            Message::Shutdown => break,
        }
    }

    session.close();
    Ok(())
}

// ── Cadence ───────────────────────────────────────────────────────────────────

/// The sampling clock.  Ticks once at start-up, then every `interval_ms`.
struct Cadence {
    interval_ms: u64,
    ticker:      Interval,
}

impl Cadence {
    fn new(interval_ms: u64) -> Self {
        let mut ticker = interval(Duration::from_millis(interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval_ms, ticker }
    }

    async fn tick(&mut self) {
        self.ticker.tick().await;
    }

    /// Switch to a new period.  Returns `false` and keeps the running clock
    /// when the period is unchanged; otherwise the next tick is one full new
    /// period away, so a reload never causes an extra sample.
    fn set_interval(&mut self, interval_ms: u64) -> bool {
        if interval_ms == self.interval_ms {
            return false;
        }
        let period = Duration::from_millis(interval_ms);
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval_ms = interval_ms;
        self.ticker = ticker;
        true
    }
}

// ── Shutdown ──────────────────────────────────────────────────────────────────

/// Ctrl-C and SIGTERM, both of which end the loop cleanly.
struct ShutdownSignals {
    interrupt: Signal,
    terminate: Signal,
}

impl ShutdownSignals {
    fn install() -> Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Wait for either signal and return its name.
    async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "interrupt",
            _ = self.terminate.recv() => "terminate",
        }
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

async fn build_notifier(mode: NotificationMode) -> Box<dyn Notifier> {
    match mode {
        NotificationMode::Log => Box::new(LogNotifier),
        NotificationMode::Desktop => match DesktopNotifier::connect().await {
            Ok(notifier) => Box::new(notifier),
            Err(e) => {
                warn!("{e}; notifications go to the log only");
                Box::new(LogNotifier)
            }
        },
    }
}

/// One pipeline per enabled chart, each with its own surface and title.
pub fn build_monitor(config: &TelemonConfig, theme: &Theme, notifier: Box<dyn Notifier>) -> Result<Monitor> {
    let global = &config.global;
    if let Some(dir) = &global.output_dir {
        std::fs::create_dir_all(dir)?;
        info!(dir = %dir.display(), format = ?global.output_format, "writing charts to disk");
    }

    let mut monitor = Monitor::new(notifier);
    for id in MetricId::ALL {
        let Some(settings) = ChartSettings::from_config(id, config, theme) else {
            info!(metric = %id, "chart disabled");
            continue;
        };
        let title = SharedTitle::new();
        let surface = build_surface(id, config, theme, global.output_dir.as_deref(), &title);
        monitor.insert(MetricPipeline::new(id, settings, surface, Box::new(title)));
    }
    Ok(monitor)
}

fn build_surface(
    id: MetricId,
    config: &TelemonConfig,
    theme: &Theme,
    output_dir: Option<&Path>,
    title: &SharedTitle,
) -> Box<dyn DrawingSurface> {
    let size = (config.global.width, config.global.height);
    match output_dir {
        Some(dir) => Box::new(FileSurface::new(
            dir,
            id.key(),
            config.global.output_format,
            size,
            theme,
            title.clone(),
        )),
        None => Box::new(RecordingSurface::new(size.0, size.1)),
    }
}

// ── Reload ────────────────────────────────────────────────────────────────────

/// Re-read the config and apply it, returning the tick interval to use from
/// now on.  A broken config is logged and the running one kept.
fn reload(path: &Path, monitor: &mut Monitor) -> Option<u64> {
    match load_config(path) {
        Ok(config) => {
            info!("config reloaded");
            let theme = Theme::from_config(&config.theme);
            monitor.apply_config(&config, &theme);
            Some(config.global.interval_ms)
        }
        Err(e) => {
            warn!("config reload failed: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telemon_chart::ScaleStrategy;
    use telemon_config::OutputFormat;
    use telemon_core::{HardwareGroup, HardwareKind, SensorKind};
    use tokio::time::timeout;

    fn cpu() -> HardwareGroup {
        HardwareGroup::new(HardwareKind::Cpu, "Test CPU")
            .with_sensor("CPU Total", SensorKind::Load, 25.0)
            .with_sensor("CPU Package", SensorKind::Temperature, 55.0)
    }

    #[test]
    fn monitor_has_a_pipeline_per_enabled_chart() {
        let config = TelemonConfig::default();
        let monitor = build_monitor(&config, &Theme::default(), Box::new(LogNotifier)).unwrap();
        let ids: Vec<_> = monitor.pipelines().map(MetricPipeline::id).collect();
        assert!(!ids.contains(&MetricId::CpuClock));
        assert_eq!(ids.len(), MetricId::ALL.len() - 1);
    }

    #[test]
    fn file_output_is_written_per_metric() {
        let dir = std::env::temp_dir().join(format!("telemon-shell-{}", std::process::id()));
        let mut config = TelemonConfig::default();
        config.global.output_dir = Some(dir.clone());
        config.global.output_format = OutputFormat::Json;

        let mut monitor = build_monitor(&config, &Theme::default(), Box::new(LogNotifier)).unwrap();
        let groups = vec![cpu()];
        monitor.bind_groups(&groups);
        let report = monitor.feed(&groups);

        assert!(report.failed.is_empty());
        assert!(dir.join("cpu_load.json").exists());
        assert!(dir.join("cpu_temperature.json").exists());
        assert!(!dir.join("gpu_load.json").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn broken_reload_keeps_running_config() {
        let dir = std::env::temp_dir().join(format!("telemon-reload-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("telemon.toml");
        let mut monitor =
            build_monitor(&TelemonConfig::default(), &Theme::default(), Box::new(LogNotifier)).unwrap();

        std::fs::write(&path, "[global]\ninterval_ms = 2000\n").unwrap();
        assert_eq!(reload(&path, &mut monitor), Some(2_000));

        std::fs::write(&path, "[global\n").unwrap();
        assert_eq!(reload(&path, &mut monitor), None);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn changed_interval_waits_a_full_period() {
        let mut cadence = Cadence::new(1_000);
        let start = Instant::now();
        cadence.tick().await;
        assert!(start.elapsed() < Duration::from_millis(1));

        assert!(!cadence.set_interval(1_000));
        cadence.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(1_000));

        assert!(cadence.set_interval(2_500));
        cadence.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(3_500));
    }

    #[tokio::test]
    async fn sigterm_requests_shutdown() {
        let mut signals = ShutdownSignals::install().unwrap();
        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let name = timeout(Duration::from_secs(5), signals.recv()).await.unwrap();
        assert_eq!(name, "terminate");
    }

    #[tokio::test]
    async fn edited_config_is_applied_once_per_save() {
        let dir = std::env::temp_dir().join(format!("telemon-live-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("telemon.toml");
        std::fs::write(&path, "[global]\ninterval_ms = 1000\n").unwrap();

        let config = load_config(&path).unwrap();
        let mut monitor = build_monitor(&config, &Theme::default(), Box::new(LogNotifier)).unwrap();
        let groups = vec![cpu()];
        monitor.bind_groups(&groups);
        monitor.feed(&groups);
        let mut cadence = Cadence::new(config.global.interval_ms);

        let (_watcher, mut reloads) = ConfigWatcher::spawn(&path);
        tokio::time::sleep(Duration::from_millis(200)).await;

        // first save: new scale, same interval
        std::fs::write(
            &path,
            "[global]\ninterval_ms = 1000\n\n[charts.cpu_temperature]\nscale = \"fixed_threshold\"\n",
        )
        .unwrap();
        timeout(Duration::from_secs(5), reloads.recv()).await.unwrap().unwrap();
        let interval_ms = reload(&path, &mut monitor).unwrap();
        assert!(!cadence.set_interval(interval_ms));

        let temperature = monitor.pipeline(MetricId::CpuTemperature).unwrap();
        assert_eq!(temperature.scale(), ScaleStrategy::FixedThresholdRange);
        assert_eq!(temperature.series().len(), 1);
        assert!(timeout(Duration::from_millis(600), reloads.recv()).await.is_err());

        // second save: default scale, slower interval
        std::fs::write(&path, "[global]\ninterval_ms = 1500\n").unwrap();
        timeout(Duration::from_secs(5), reloads.recv()).await.unwrap().unwrap();
        let interval_ms = reload(&path, &mut monitor).unwrap();
        assert!(cadence.set_interval(interval_ms));

        let temperature = monitor.pipeline(MetricId::CpuTemperature).unwrap();
        assert_ne!(temperature.scale(), ScaleStrategy::FixedThresholdRange);
        assert_eq!(temperature.series().len(), 1);
        assert!(timeout(Duration::from_millis(600), reloads.recv()).await.is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
