const GIB: u64 = 1 << 30;
const MIB: u64 = 1 << 20;
const KIB: u64 = 1 << 10;

/// Format a byte count as a human-readable string (e.g. `"7.3 GiB"`).
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Bytes → gigabytes, the unit of `SensorKind::Data` readings.
pub fn bytes_to_gb(bytes: u64) -> f32 {
    (bytes as f64 / GIB as f64) as f32
}

/// Bytes → megabytes, the unit of `SensorKind::SmallData` readings.
pub fn bytes_to_mb(bytes: u64) -> f32 {
    (bytes as f64 / MIB as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_picks_a_unit() {
        assert_eq!(format_bytes(16 * GIB), "16.0 GiB");
        assert_eq!(format_bytes(0), "0 B");
    }

    #[test]
    fn unit_conversions() {
        assert_eq!(bytes_to_gb(4 * GIB), 4.0);
        assert_eq!(bytes_to_mb(8 * GIB), 8192.0);
    }
}
