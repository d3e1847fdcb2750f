use serde::{Deserialize, Serialize};

/// Hardware component a group of sensors belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HardwareKind {
    Cpu,
    Gpu,
    Memory,
}

/// Physical quantity a sensor reports.
///
/// `Data` values are gigabytes, `SmallData` values are megabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Load,
    Temperature,
    Power,
    Clock,
    Data,
    SmallData,
}

/// A single named sensor and its value for the current tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub name:  String,
    pub kind:  SensorKind,
    /// `None` when the sensor exists but produced no value this tick.
    pub value: Option<f32>,
}

impl SensorReading {
    pub fn new(name: impl Into<String>, kind: SensorKind, value: Option<f32>) -> Self {
        Self {
            name: name.into(),
            kind,
            value,
        }
    }
}

/// One hardware component as reported by a sensor provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareGroup {
    pub kind:    HardwareKind,
    /// Vendor / model string, e.g. `"AMD Ryzen 7 5800X"`.
    pub name:    String,
    pub sensors: Vec<SensorReading>,
}

impl HardwareGroup {
    pub fn new(kind: HardwareKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            sensors: Vec::new(),
        }
    }

    /// Builder-style helper used by providers and tests.
    #[must_use]
    pub fn with_sensor(mut self, name: &str, kind: SensorKind, value: f32) -> Self {
        self.sensors.push(SensorReading::new(name, kind, Some(value)));
        self
    }
}
