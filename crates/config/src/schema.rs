use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use telemon_core::{Result, TelemonError};

/// Root configuration structure parsed from `telemon.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TelemonConfig {
    /// Sampling, history and output settings.
    pub global: GlobalConfig,
    /// Theme / visual settings shared by every chart.
    pub theme: ThemeConfig,
    /// Per-chart settings.
    pub charts: ChartsConfig,
}

impl TelemonConfig {
    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let g = &self.global;
        if g.history < 2 {
            return Err(TelemonError::Config(format!(
                "global.history must be at least 2 (got {})",
                g.history
            )));
        }
        if g.interval_ms < 100 {
            return Err(TelemonError::Config(format!(
                "global.interval_ms must be at least 100 (got {})",
                g.interval_ms
            )));
        }
        if !(g.width > 0.0 && g.height > 0.0) {
            return Err(TelemonError::Config(format!(
                "chart size must be positive (got {}x{})",
                g.width, g.height
            )));
        }
        Ok(())
    }
}

/// Global monitor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Tick period in milliseconds.
    pub interval_ms: u64,
    /// Samples retained per chart.
    pub history: usize,
    /// Chart surface width in pixels.
    pub width: f32,
    /// Chart surface height in pixels.
    pub height: f32,
    /// Directory that receives one rendered file per chart.  `None` keeps
    /// rendering headless (scenes are built and discarded).
    pub output_dir: Option<PathBuf>,
    pub output_format: OutputFormat,
    pub notifications: NotificationMode,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            interval_ms:   1_000,
            history:       telemon_core::series::DEFAULT_CAPACITY,
            width:         300.0,
            height:        100.0,
            output_dir:    None,
            output_format: OutputFormat::Svg,
            notifications: NotificationMode::Desktop,
        }
    }
}

/// File format written by the file-backed chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Json,
}

/// Where non-fatal errors are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMode {
    /// Desktop notification over D-Bus, falling back to the log.
    #[default]
    Desktop,
    /// Log only.
    Log,
}

/// Horizontal placement of gridline labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LabelAlign {
    #[default]
    Right,
    Left,
}

/// How percentage gridlines are labelled once the axis max exceeds 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PercentLabels {
    /// Always `75% / 50% / 25% / 0%`, as if the axis were 0–100.
    #[default]
    Nominal,
    /// The actual value at each gridline.
    Scaled,
}

/// Axis scaling policy for one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleChoice {
    FixedRange,
    Adaptive,
    FixedThreshold,
}

/// Theme / styling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Chart background color (hex, e.g. `"#1e1e2e"`).
    pub background: String,
    /// Dashed gridline color.
    pub grid: String,
    /// Gridline label color.
    pub label: String,
    /// Temperature warning threshold line.
    pub warning: String,
    /// Temperature critical threshold line.
    pub critical: String,
    /// Gridline label font size in pixels.
    pub font_size: f32,
    pub label_align: LabelAlign,
    pub percent_labels: PercentLabels,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background:     "#1e1e2e".to_string(),
            grid:           "#808080".to_string(),
            label:          "#ffffff".to_string(),
            warning:        "#ffff00".to_string(),
            critical:       "#ff0000".to_string(),
            font_size:      10.0,
            label_align:    LabelAlign::Right,
            percent_labels: PercentLabels::Nominal,
        }
    }
}

/// Config block for a single chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub enabled: bool,
    /// Line color override (hex).  `None` = the metric's built-in color.
    pub color: Option<String>,
    /// Scale override.  `None` = the metric's default strategy.
    pub scale: Option<ScaleChoice>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color:   None,
            scale:   None,
        }
    }
}

impl ChartConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// One block per chartable metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    pub cpu_load:        ChartConfig,
    pub cpu_temperature: ChartConfig,
    pub cpu_power:       ChartConfig,
    pub cpu_clock:       ChartConfig,
    pub gpu_load:        ChartConfig,
    pub gpu_temperature: ChartConfig,
    pub gpu_power:       ChartConfig,
    pub gpu_memory:      ChartConfig,
    pub system_memory:   ChartConfig,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            cpu_load:        ChartConfig::default(),
            cpu_temperature: ChartConfig::default(),
            cpu_power:       ChartConfig::default(),
            cpu_clock:       ChartConfig::disabled(),
            gpu_load:        ChartConfig::default(),
            gpu_temperature: ChartConfig::default(),
            gpu_power:       ChartConfig::default(),
            gpu_memory:      ChartConfig::default(),
            system_memory:   ChartConfig::default(),
        }
    }
}

impl ChartsConfig {
    /// Look up a chart block by its TOML key (e.g. `"cpu_load"`).
    pub fn get(&self, key: &str) -> Option<&ChartConfig> {
        Some(match key {
            "cpu_load"        => &self.cpu_load,
            "cpu_temperature" => &self.cpu_temperature,
            "cpu_power"       => &self.cpu_power,
            "cpu_clock"       => &self.cpu_clock,
            "gpu_load"        => &self.gpu_load,
            "gpu_temperature" => &self.gpu_temperature,
            "gpu_power"       => &self.gpu_power,
            "gpu_memory"      => &self.gpu_memory,
            "system_memory"   => &self.system_memory,
            _ => return None,
        })
    }
}
