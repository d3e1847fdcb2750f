use std::fmt;
use telemon_core::MetricKind;
use telemon_system::SensorRole;
use telemon_theme::Color;

/// Every chart the monitor can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricId {
    CpuLoad,
    CpuTemperature,
    CpuPower,
    CpuClock,
    GpuLoad,
    GpuTemperature,
    GpuPower,
    GpuMemory,
    SystemMemory,
}

impl MetricId {
    pub const ALL: [MetricId; 9] = [
        Self::CpuLoad,
        Self::CpuTemperature,
        Self::CpuPower,
        Self::CpuClock,
        Self::GpuLoad,
        Self::GpuTemperature,
        Self::GpuPower,
        Self::GpuMemory,
        Self::SystemMemory,
    ];

    pub fn kind(self) -> MetricKind {
        match self {
            Self::CpuLoad | Self::GpuLoad | Self::GpuMemory | Self::SystemMemory => MetricKind::Percentage,
            Self::CpuTemperature | Self::GpuTemperature => MetricKind::Temperature,
            Self::CpuPower | Self::GpuPower => MetricKind::Power,
            Self::CpuClock => MetricKind::RawValue,
        }
    }

    /// Key of the `[charts.<key>]` config block; also used for file names.
    pub fn key(self) -> &'static str {
        match self {
            Self::CpuLoad        => "cpu_load",
            Self::CpuTemperature => "cpu_temperature",
            Self::CpuPower       => "cpu_power",
            Self::CpuClock       => "cpu_clock",
            Self::GpuLoad        => "gpu_load",
            Self::GpuTemperature => "gpu_temperature",
            Self::GpuPower       => "gpu_power",
            Self::GpuMemory      => "gpu_memory",
            Self::SystemMemory   => "system_memory",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::CpuLoad        => "CPU Load",
            Self::CpuTemperature => "CPU Temperature",
            Self::CpuPower       => "CPU Power",
            Self::CpuClock       => "CPU Clock",
            Self::GpuLoad        => "GPU Load",
            Self::GpuTemperature => "GPU Temperature",
            Self::GpuPower       => "GPU Power",
            Self::GpuMemory      => "GPU Memory Usage",
            Self::SystemMemory   => "System Memory Usage",
        }
    }

    pub fn default_color(self) -> Color {
        match self {
            Self::CpuLoad        => Color::RED,
            Self::CpuTemperature => Color::ORANGE_RED,
            Self::CpuPower       => Color::PURPLE,
            Self::CpuClock       => Color::STEEL_BLUE,
            Self::GpuLoad        => Color::ORANGE,
            Self::GpuTemperature => Color::CRIMSON,
            Self::GpuPower       => Color::DARK_ORCHID,
            Self::GpuMemory      => Color::GREEN,
            Self::SystemMemory   => Color::BLUE,
        }
    }

    /// Title text showing the latest value, e.g. `"CPU Load - 12.5%"`.
    pub fn format_title(self, value: f32) -> String {
        let formatted = self.kind().format_value(value);
        match self {
            Self::CpuClock => format!("{} - {formatted} MHz", self.title()),
            _ => format!("{} - {formatted}", self.title()),
        }
    }

    /// Sensor roles this metric is computed from.
    pub fn roles(self) -> &'static [SensorRole] {
        use SensorRole::*;
        match self {
            Self::CpuLoad        => &[CpuLoad],
            Self::CpuTemperature => &[CpuTemperature],
            Self::CpuPower       => &[CpuPower],
            Self::CpuClock       => &[CpuClock],
            Self::GpuLoad        => &[GpuLoad],
            Self::GpuTemperature => &[GpuTemperature],
            Self::GpuPower       => &[GpuPower],
            Self::GpuMemory      => &[GpuMemoryLoad, GpuMemoryUsed, GpuMemoryTotal],
            Self::SystemMemory   => &[MemoryLoad, MemoryUsed, MemoryAvailable, MemoryTotal],
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
