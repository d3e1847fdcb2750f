use serde::{Deserialize, Serialize};

/// Broad category of a charted signal.  Drives the default scale strategy
/// and the unit suffix used in labels and titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Percentage,
    Temperature,
    Power,
    RawValue,
}

impl MetricKind {
    /// Unit suffix appended to gridline labels and titles.
    pub fn unit(self) -> &'static str {
        match self {
            Self::Percentage  => "%",
            Self::Temperature => "°C",
            Self::Power       => "W",
            Self::RawValue    => "",
        }
    }

    /// Format a value the way chart titles show it (one decimal place).
    pub fn format_value(self, value: f32) -> String {
        match self {
            Self::RawValue => format!("{value:.0}"),
            _              => format!("{value:.1}{}", self.unit()),
        }
    }
}
