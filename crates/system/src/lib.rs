//! Hardware sensor access: the sensor catalogue and the `sysinfo`/sysfs
//! backed [`SensorProvider`](telemon_core::SensorProvider).

pub mod catalogue;
pub mod gpu;
pub mod memory;
pub mod provider;
pub mod rapl;
pub mod sysfs;

pub use catalogue::{Binding, Catalogue, SensorPattern, SensorRole, Selection};
pub use provider::SysinfoProvider;
