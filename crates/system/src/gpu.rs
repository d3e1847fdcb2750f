use crate::memory::bytes_to_mb;
use crate::sysfs::{find_with_attribute, read_value};
use std::path::{Path, PathBuf};
use telemon_core::{HardwareGroup, HardwareKind, SensorKind, SensorReading};

/// Default DRM class directory.
pub const DRM_CLASS: &str = "/sys/class/drm";

/// A GPU exposed through the DRM sysfs interface (amdgpu and friends).
#[derive(Debug, Clone)]
pub struct DrmGpu {
    /// `…/cardN/device`
    device: PathBuf,
    name:   String,
}

impl DrmGpu {
    /// First card under `drm_class` that reports `gpu_busy_percent`.
    pub fn discover(drm_class: impl AsRef<Path>) -> Option<Self> {
        let card = find_with_attribute(drm_class, "card", "device/gpu_busy_percent")?;
        let card_name = card.file_name()?.to_string_lossy().into_owned();
        let device = card.join("device");

        let name = std::fs::read_to_string(device.join("product_name"))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("GPU ({card_name})"));

        Some(Self { device, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read load, VRAM and power.  The driver reports no memory load, so
    /// consumers derive it from used / total.
    /// `temperature` comes from the component list, which already covers hwmon temperature inputs.
    pub fn read(&self, temperature: Option<f32>) -> HardwareGroup {
        let load: Option<f32> = read_value::<u32>(self.device.join("gpu_busy_percent")).map(|v| v as f32);
        let used = read_value::<u64>(self.device.join("mem_info_vram_used")).map(bytes_to_mb);
        let total = read_value::<u64>(self.device.join("mem_info_vram_total")).map(bytes_to_mb);
        let power = find_with_attribute(self.device.join("hwmon"), "hwmon", "power1_average")
            .and_then(|hwmon| read_value::<u64>(hwmon.join("power1_average")))
            .map(|microwatts| microwatts as f32 / 1_000_000.0);

        let mut group = HardwareGroup::new(HardwareKind::Gpu, self.name.clone());
        group.sensors = vec![
            SensorReading::new("GPU Core", SensorKind::Load, load),
            SensorReading::new("GPU Core", SensorKind::Temperature, temperature),
            SensorReading::new("GPU Package", SensorKind::Power, power),
            SensorReading::new("GPU Memory Used", SensorKind::SmallData, used),
            SensorReading::new("GPU Memory Total", SensorKind::SmallData, total),
        ];
        group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_fake_amdgpu_tree() {
        let root = std::env::temp_dir().join(format!("telemon-drm-{}", std::process::id()));
        let device = root.join("card0/device");
        std::fs::create_dir_all(device.join("hwmon/hwmon3")).unwrap();
        std::fs::write(device.join("gpu_busy_percent"), "64\n").unwrap();
        std::fs::write(device.join("mem_info_vram_used"), (4u64 << 30).to_string()).unwrap();
        std::fs::write(device.join("mem_info_vram_total"), (8u64 << 30).to_string()).unwrap();
        std::fs::write(device.join("hwmon/hwmon3/power1_average"), "120000000\n").unwrap();

        let gpu = DrmGpu::discover(&root).unwrap();
        assert_eq!(gpu.name(), "GPU (card0)");

        let group = gpu.read(Some(61.0));
        let value = |name: &str, kind: SensorKind| {
            group.sensors.iter().find(|s| s.name == name && s.kind == kind).and_then(|s| s.value)
        };
        assert_eq!(value("GPU Core", SensorKind::Load), Some(64.0));
        assert_eq!(value("GPU Core", SensorKind::Temperature), Some(61.0));
        assert_eq!(value("GPU Package", SensorKind::Power), Some(120.0));
        assert_eq!(value("GPU Memory Used", SensorKind::SmallData), Some(4096.0));
        assert_eq!(value("GPU Memory Total", SensorKind::SmallData), Some(8192.0));
        assert!(group.sensors.iter().all(|s| s.kind != SensorKind::Load || s.name != "GPU Memory"));

        std::fs::remove_dir_all(&root).unwrap();
    }
}
