use crate::gpu::{DrmGpu, DRM_CLASS};
use crate::memory::{bytes_to_gb, format_bytes};
use crate::rapl::{RaplMeter, RAPL_PACKAGE};
use sysinfo::{Components, System};
use telemon_core::{
    HardwareGroup, HardwareKind, Result, SensorKind, SensorProvider, SensorReading, TelemonError,
};
use tracing::{debug, info};

/// Sensor provider backed by `sysinfo` plus a few Linux sysfs interfaces
/// (RAPL for CPU package power, DRM for GPU load / VRAM / power).
///
/// Sensor names follow the conventions the catalogue matches on:
/// `"CPU Total"`, `"CPU Package"`, `"Core #N"`, `"GPU Core"`, `"Memory Used"`…
#[derive(Debug, Default)]
pub struct SysinfoProvider {
    handles: Option<Handles>,
}

#[derive(Debug)]
struct Handles {
    sys:        System,
    components: Components,
    rapl:       Option<RaplMeter>,
    gpu:        Option<DrmGpu>,
}

impl SysinfoProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SensorProvider for SysinfoProvider {
    fn name(&self) -> &str {
        "sysinfo"
    }

    fn open(&mut self) -> Result<()> {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        sys.refresh_memory();

        if sys.cpus().is_empty() {
            return Err(TelemonError::Provider("no CPU information available".into()));
        }

        let components = Components::new_with_refreshed_list();
        let rapl = RaplMeter::open(RAPL_PACKAGE);
        let gpu = DrmGpu::discover(DRM_CLASS);

        info!(
            cpu = sys.cpus()[0].brand(),
            cores = sys.cpus().len(),
            memory = %format_bytes(sys.total_memory()),
            components = components.list().len(),
            rapl = rapl.is_some(),
            gpu = ?gpu.as_ref().map(DrmGpu::name),
            "hardware detected"
        );

        self.handles = Some(Handles {
            sys,
            components,
            rapl,
            gpu,
        });
        Ok(())
    }

    fn poll(&mut self) -> Result<Vec<HardwareGroup>> {
        let h = self
            .handles
            .as_mut()
            .ok_or_else(|| TelemonError::Provider("provider polled before open".into()))?;

        h.sys.refresh_cpu_usage();
        h.sys.refresh_cpu_frequency();
        h.sys.refresh_memory();
        h.components.refresh(false);

        let temps = ComponentTemps::collect(&h.components);
        let mut groups = vec![cpu_group(&h.sys, &temps, h.rapl.as_mut())];
        if let Some(gpu) = &h.gpu {
            groups.push(gpu.read(temps.gpu));
        }
        groups.push(memory_group(&h.sys));

        debug!(groups = groups.len(), "sensors polled");
        Ok(groups)
    }

    fn close(&mut self) {
        self.handles = None;
    }
}

/// Temperatures picked out of the component list.
#[derive(Debug, Default)]
struct ComponentTemps {
    package: Option<f32>,
    cores:   Vec<f32>,
    gpu:     Option<f32>,
}

impl ComponentTemps {
    fn collect(components: &Components) -> Self {
        let mut temps = Self::default();
        for component in components.list() {
            let Some(t) = component.temperature() else {
                continue;
            };
            match classify_component(component.label()) {
                Some(ComponentRole::Package) => temps.package = Some(t),
                Some(ComponentRole::Core)    => temps.cores.push(t),
                Some(ComponentRole::Gpu)     => temps.gpu = Some(t),
                None => {}
            }
        }
        temps
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComponentRole {
    Package,
    Core,
    Gpu,
}

/// Map a hwmon component label (`"coretemp Package id 0"`, `"k10temp Tctl"`,
/// `"amdgpu edge"`…) to the sensor it stands for.
fn classify_component(label: &str) -> Option<ComponentRole> {
    let lower = label.to_ascii_lowercase();
    if lower.contains("amdgpu") || lower.contains("nouveau") || lower.contains("gpu") {
        Some(ComponentRole::Gpu)
    } else if lower.contains("package") || lower.contains("tctl") || lower.contains("tdie") {
        Some(ComponentRole::Package)
    } else if lower.contains("coretemp core") {
        Some(ComponentRole::Core)
    } else {
        None
    }
}

fn cpu_group(sys: &System, temps: &ComponentTemps, rapl: Option<&mut RaplMeter>) -> HardwareGroup {
    let cpus = sys.cpus();
    let brand = cpus.first().map_or("CPU", |c| c.brand());
    let mut group = HardwareGroup::new(HardwareKind::Cpu, brand);

    for (i, cpu) in cpus.iter().enumerate() {
        let n = i + 1;
        group.sensors.push(SensorReading::new(format!("Core #{n}"), SensorKind::Clock, Some(cpu.frequency() as f32)));
        group.sensors.push(SensorReading::new(format!("Core #{n}"), SensorKind::Load, Some(cpu.cpu_usage())));
    }
    group.sensors.push(SensorReading::new("CPU Total", SensorKind::Load, Some(sys.global_cpu_usage())));

    for (i, t) in temps.cores.iter().enumerate() {
        group.sensors.push(SensorReading::new(format!("CPU Core #{} Temp", i + 1), SensorKind::Temperature, Some(*t)));
    }
    group.sensors.push(SensorReading::new("CPU Package", SensorKind::Temperature, temps.package));
    group.sensors.push(SensorReading::new("CPU Package", SensorKind::Power, rapl.and_then(RaplMeter::sample)));

    group
}

fn memory_group(sys: &System) -> HardwareGroup {
    let total = sys.total_memory();
    let used = sys.used_memory();
    let load = (total > 0).then(|| (used as f64 / total as f64 * 100.0) as f32);

    let mut group = HardwareGroup::new(HardwareKind::Memory, "Generic Memory");
    group.sensors = vec![
        SensorReading::new("Memory", SensorKind::Load, load),
        SensorReading::new("Memory Used", SensorKind::Data, Some(bytes_to_gb(used))),
        SensorReading::new("Memory Available", SensorKind::Data, Some(bytes_to_gb(sys.available_memory()))),
        SensorReading::new("Virtual Memory Used", SensorKind::Data, Some(bytes_to_gb(sys.used_swap()))),
        SensorReading::new("Virtual Memory Available", SensorKind::Data, Some(bytes_to_gb(sys.free_swap()))),
    ];
    group
}
