//! Turning one tick's [`Selection`] into a value per [`MetricId`].

use crate::metric::MetricId;
use telemon_system::{SensorRole, Selection};

const MB_PER_GB: f32 = 1024.0;

/// Latest reading for `id`, or `None` when the metric is absent this tick.
pub fn extract(id: MetricId, selection: &Selection) -> Option<f32> {
    use SensorRole::*;
    match id {
        MetricId::CpuLoad        => selection.get(CpuLoad),
        MetricId::CpuTemperature => selection.get(CpuTemperature),
        MetricId::CpuPower       => selection.get(CpuPower),
        MetricId::CpuClock       => selection.get(CpuClock),
        MetricId::GpuLoad        => selection.get(GpuLoad),
        MetricId::GpuTemperature => selection.get(GpuTemperature),
        MetricId::GpuPower       => selection.get(GpuPower),
        MetricId::GpuMemory => memory_percentage(
            selection.get(GpuMemoryLoad),
            selection.get(GpuMemoryUsed).map(|mb| mb / MB_PER_GB),
            selection.get(GpuMemoryTotal).map(|mb| mb / MB_PER_GB),
        ),
        MetricId::SystemMemory => {
            let used = selection.get(MemoryUsed);
            let total = selection.get(MemoryTotal).or_else(|| {
                let available = selection.get(MemoryAvailable)?;
                Some(used? + available)
            });
            memory_percentage(selection.get(MemoryLoad), used, total)
        }
    }
}

/// Load percentage if the sensor reports one, otherwise `used / total · 100`.
///
/// A zero or non-finite total makes the metric unavailable.
pub fn memory_percentage(load: Option<f32>, used_gb: Option<f32>, total_gb: Option<f32>) -> Option<f32> {
    if load.is_some() {
        return load;
    }
    let (used, total) = (used_gb?, total_gb?);
    (total.is_finite() && total > 0.0 && used.is_finite()).then(|| used / total * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_wins_over_used_and_total() {
        assert_eq!(memory_percentage(Some(42.0), Some(1.0), Some(8.0)), Some(42.0));
        assert_eq!(memory_percentage(None, Some(4.0), Some(8.0)), Some(50.0));
    }

    #[test]
    fn zero_or_missing_total_is_absent() {
        assert_eq!(memory_percentage(None, Some(4.0), Some(0.0)), None);
        assert_eq!(memory_percentage(None, Some(4.0), Some(f32::INFINITY)), None);
        assert_eq!(memory_percentage(None, Some(4.0), None), None);
        assert_eq!(memory_percentage(None, None, Some(8.0)), None);
    }

    #[test]
    fn gpu_memory_from_megabytes() {
        let selection: Selection = [
            (SensorRole::GpuMemoryUsed, 4_096.0),
            (SensorRole::GpuMemoryTotal, 8_192.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(extract(MetricId::GpuMemory, &selection), Some(50.0));
        assert_eq!(extract(MetricId::GpuLoad, &selection), None);
    }

    #[test]
    fn system_memory_total_from_used_plus_available() {
        let selection: Selection = [
            (SensorRole::MemoryUsed, 6.0),
            (SensorRole::MemoryAvailable, 10.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(extract(MetricId::SystemMemory, &selection), Some(37.5));

        let only_available: Selection = [(SensorRole::MemoryAvailable, 10.0)].into_iter().collect();
        assert_eq!(extract(MetricId::SystemMemory, &only_available), None);
    }

    #[test]
    fn plain_metrics_pass_through() {
        let selection: Selection = [(SensorRole::CpuTemperature, 72.5)].into_iter().collect();
        assert_eq!(extract(MetricId::CpuTemperature, &selection), Some(72.5));
        assert_eq!(extract(MetricId::CpuPower, &selection), None);
    }
}
