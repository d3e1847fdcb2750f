pub mod error;
pub mod event;
pub mod metric;
pub mod provider;
pub mod sensor;
pub mod series;

pub use error::{Result, TelemonError};
pub use event::Message;
pub use metric::MetricKind;
pub use provider::{ProviderSession, SensorProvider};
pub use sensor::{HardwareGroup, HardwareKind, SensorKind, SensorReading};
pub use series::RollingSeries;
