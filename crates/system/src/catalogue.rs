//! Sensor selection.
//!
//! Providers report sensors by free-form name.  Each [`SensorRole`] names one
//! signal the monitor cares about together with the hardware kind, sensor
//! kind and name substring that identify it.  A [`Catalogue`] binds every
//! role to one concrete sensor at startup; afterwards only bound sensors are
//! read, so a sensor that shows up later under a similar name is never
//! mistaken for the one that was validated.

use std::collections::BTreeMap;
use std::fmt;
use telemon_core::{HardwareGroup, HardwareKind, SensorKind};
use tracing::{debug, info, warn};

/// A signal the monitor reads from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SensorRole {
    CpuClock,
    CpuLoad,
    CpuTemperature,
    CpuPower,
    GpuClock,
    GpuLoad,
    GpuTemperature,
    GpuPower,
    GpuMemoryUsed,
    GpuMemoryTotal,
    GpuMemoryLoad,
    MemoryLoad,
    MemoryUsed,
    MemoryAvailable,
    MemoryTotal,
}

/// How a role is recognised among a hardware group's sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorPattern {
    pub hardware: HardwareKind,
    pub kind:     SensorKind,
    /// Substring the sensor name must contain.
    pub contains: &'static str,
}

/// Sensors whose name contains this are never bound for memory roles.
const MEMORY_EXCLUDED: &str = "Virtual";

/// Roles per hardware kind, in match priority order.  A sensor is claimed
/// by the first role it matches.
const CPU_ROLES: &[SensorRole] = &[
    SensorRole::CpuClock,
    SensorRole::CpuLoad,
    SensorRole::CpuTemperature,
    SensorRole::CpuPower,
];
const GPU_ROLES: &[SensorRole] = &[
    SensorRole::GpuClock,
    SensorRole::GpuLoad,
    SensorRole::GpuTemperature,
    SensorRole::GpuPower,
    SensorRole::GpuMemoryUsed,
    SensorRole::GpuMemoryTotal,
    SensorRole::GpuMemoryLoad,
];
const MEMORY_ROLES: &[SensorRole] = &[
    SensorRole::MemoryLoad,
    SensorRole::MemoryUsed,
    SensorRole::MemoryAvailable,
    SensorRole::MemoryTotal,
];

impl SensorRole {
    pub const ALL: [SensorRole; 15] = [
        Self::CpuClock,
        Self::CpuLoad,
        Self::CpuTemperature,
        Self::CpuPower,
        Self::GpuClock,
        Self::GpuLoad,
        Self::GpuTemperature,
        Self::GpuPower,
        Self::GpuMemoryUsed,
        Self::GpuMemoryTotal,
        Self::GpuMemoryLoad,
        Self::MemoryLoad,
        Self::MemoryUsed,
        Self::MemoryAvailable,
        Self::MemoryTotal,
    ];

    pub const fn pattern(self) -> SensorPattern {
        use HardwareKind::{Cpu, Gpu, Memory};
        use SensorKind::*;

        let (hardware, kind, contains) = match self {
            Self::CpuClock        => (Cpu, Clock, "Core #1"),
            Self::CpuLoad         => (Cpu, Load, "Total"),
            Self::CpuTemperature  => (Cpu, Temperature, "Package"),
            Self::CpuPower        => (Cpu, Power, "Package"),
            Self::GpuClock        => (Gpu, Clock, "Core"),
            Self::GpuLoad         => (Gpu, Load, "Core"),
            Self::GpuTemperature  => (Gpu, Temperature, "Core"),
            Self::GpuPower        => (Gpu, Power, "Package"),
            Self::GpuMemoryUsed   => (Gpu, SmallData, "Memory Used"),
            Self::GpuMemoryTotal  => (Gpu, SmallData, "Memory Total"),
            Self::GpuMemoryLoad   => (Gpu, Load, "Memory"),
            Self::MemoryLoad      => (Memory, Load, "Memory"),
            Self::MemoryUsed      => (Memory, Data, "Used"),
            Self::MemoryAvailable => (Memory, Data, "Available"),
            Self::MemoryTotal     => (Memory, Data, "Total"),
        };
        SensorPattern {
            hardware,
            kind,
            contains,
        }
    }

    /// Roles that can be found on `hardware`, in match priority order.
    pub fn for_hardware(hardware: HardwareKind) -> &'static [SensorRole] {
        match hardware {
            HardwareKind::Cpu    => CPU_ROLES,
            HardwareKind::Gpu    => GPU_ROLES,
            HardwareKind::Memory => MEMORY_ROLES,
        }
    }

    /// The role a sensor plays on `hardware`, if any.
    pub fn classify(hardware: HardwareKind, kind: SensorKind, name: &str) -> Option<Self> {
        if hardware == HardwareKind::Memory && name.contains(MEMORY_EXCLUDED) {
            return None;
        }
        Self::for_hardware(hardware).iter().copied().find(|role| {
            let p = role.pattern();
            p.kind == kind && name.contains(p.contains)
        })
    }
}

impl fmt::Display for SensorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.pattern();
        write!(f, "{self:?} ({:?} {:?} \"{}\")", p.hardware, p.kind, p.contains)
    }
}

/// The concrete sensor a role was bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub group:  String,
    pub sensor: String,
    pub kind:   SensorKind,
}

/// Role → sensor bindings validated against a provider's actual sensors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogue {
    bindings: BTreeMap<SensorRole, Binding>,
    /// Roles that matched more than one sensor (the last match was kept).
    ambiguous: Vec<SensorRole>,
}

impl Catalogue {
    /// Bind every role to a sensor found in `groups`.
    ///
    /// Only the first group of each hardware kind is considered.  When
    /// several sensors match one role the last one wins and the role is
    /// reported as ambiguous; roles with no match stay unbound.
    pub fn bind(groups: &[HardwareGroup]) -> Self {
        let mut catalogue = Self::default();
        let mut seen: Vec<HardwareKind> = Vec::new();

        for group in groups {
            if seen.contains(&group.kind) {
                debug!(kind = ?group.kind, name = %group.name, "additional hardware group ignored");
                continue;
            }
            seen.push(group.kind);

            for sensor in &group.sensors {
                let Some(role) = SensorRole::classify(group.kind, sensor.kind, &sensor.name) else {
                    continue;
                };
                let binding = Binding {
                    group:  group.name.clone(),
                    sensor: sensor.name.clone(),
                    kind:   sensor.kind,
                };
                if let Some(previous) = catalogue.bindings.insert(role, binding) {
                    debug!(%role, replaced = %previous.sensor, "several sensors match one role");
                    if !catalogue.ambiguous.contains(&role) {
                        catalogue.ambiguous.push(role);
                    }
                }
            }
        }

        catalogue
    }

    /// Log which roles were bound, which are missing and which were ambiguous.
    pub fn report(&self) {
        for (role, binding) in &self.bindings {
            info!(%role, group = %binding.group, sensor = %binding.sensor, "sensor bound");
        }
        for role in &self.ambiguous {
            let chosen = self.bindings.get(role).map_or("", |b| b.sensor.as_str());
            warn!(%role, %chosen, "several sensors match; using the last one");
        }
        for role in self.missing() {
            warn!(%role, "no matching sensor; readings will be absent");
        }
    }

    pub fn binding(&self, role: SensorRole) -> Option<&Binding> {
        self.bindings.get(&role)
    }

    pub fn is_bound(&self, role: SensorRole) -> bool {
        self.bindings.contains_key(&role)
    }

    pub fn ambiguous(&self) -> &[SensorRole] {
        &self.ambiguous
    }

    pub fn missing(&self) -> impl Iterator<Item = SensorRole> + '_ {
        SensorRole::ALL.into_iter().filter(|r| !self.is_bound(*r))
    }

    /// Read the current value of every bound role from `groups`.
    ///
    /// A role is absent from the result when its bound group or sensor is
    /// missing this tick or the sensor carries no value.
    pub fn select(&self, groups: &[HardwareGroup]) -> Selection {
        let mut values = BTreeMap::new();

        for (role, binding) in &self.bindings {
            let hardware = role.pattern().hardware;
            let value = groups
                .iter()
                .find(|g| g.kind == hardware && g.name == binding.group)
                .and_then(|g| {
                    g.sensors
                        .iter()
                        .rev()
                        .find(|s| s.kind == binding.kind && s.name == binding.sensor)
                })
                .and_then(|s| s.value);

            if let Some(value) = value {
                values.insert(*role, value);
            }
        }

        Selection { values }
    }
}

/// Values read for one tick, keyed by role.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    values: BTreeMap<SensorRole, f32>,
}

impl Selection {
    pub fn get(&self, role: SensorRole) -> Option<f32> {
        self.values.get(&role).copied()
    }

    pub fn insert(&mut self, role: SensorRole, value: f32) {
        self.values.insert(role, value);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(SensorRole, f32)> for Selection {
    fn from_iter<I: IntoIterator<Item = (SensorRole, f32)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
