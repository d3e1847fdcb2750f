use crate::sysfs::read_value;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Default location of the package-0 RAPL domain.
pub const RAPL_PACKAGE: &str = "/sys/class/powercap/intel-rapl:0";

/// Package power derived from the RAPL cumulative energy counter.
///
/// The counter only gives energy, so power needs two samples: the first
/// call to [`RaplMeter::sample`] primes the meter and yields `None`.
#[derive(Debug)]
pub struct RaplMeter {
    domain: PathBuf,
    /// Counter value at which `energy_uj` wraps to zero.
    max_energy_uj: Option<u64>,
    last: Option<(u64, Instant)>,
}

impl RaplMeter {
    /// `None` when the domain is absent or unreadable (non-Intel/AMD hosts,
    /// or `energy_uj` restricted to root).
    pub fn open(domain: impl AsRef<Path>) -> Option<Self> {
        let domain = domain.as_ref().to_path_buf();
        read_value::<u64>(domain.join("energy_uj"))?;
        Some(Self {
            max_energy_uj: read_value(domain.join("max_energy_range_uj")),
            domain,
            last: None,
        })
    }

    /// Average power in watts since the previous call.
    pub fn sample(&mut self) -> Option<f32> {
        let energy: u64 = read_value(self.domain.join("energy_uj"))?;
        self.sample_at(energy, Instant::now())
    }

    fn sample_at(&mut self, energy_uj: u64, now: Instant) -> Option<f32> {
        let previous = self.last.replace((energy_uj, now));
        let (last_energy, last_time) = previous?;

        let elapsed = now.duration_since(last_time).as_secs_f64();
        if elapsed <= 0.0 {
            return None;
        }

        let delta = if energy_uj >= last_energy {
            energy_uj - last_energy
        } else {
            // counter wrapped
            let max = self.max_energy_uj?;
            max.saturating_sub(last_energy) + energy_uj
        };

        Some((delta as f64 / 1_000_000.0 / elapsed) as f32)
    }
}
