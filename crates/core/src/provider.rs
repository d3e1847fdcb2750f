use crate::{error::Result, sensor::HardwareGroup};

/// Source of hardware readings, queried once per tick.
///
/// Providers are driven from a single thread: `open` once at startup, `poll`
/// on every tick, `close` once at shutdown.  A failing `poll` is never fatal
/// to the caller's tick loop.
pub trait SensorProvider: std::fmt::Debug {
    /// Human-readable provider name for logs.
    fn name(&self) -> &str;

    /// Acquire hardware handles.  Failure here is unrecoverable.
    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    /// Refresh and return the current readings, grouped by hardware component.
    fn poll(&mut self) -> Result<Vec<HardwareGroup>>;

    /// Release hardware handles.
    fn close(&mut self) {}
}

/// Scoped ownership of an opened [`SensorProvider`].
///
/// The provider is closed exactly once: either by [`ProviderSession::close`]
/// or, failing that, when the session is dropped (including during unwinding).
#[derive(Debug)]
pub struct ProviderSession<P: SensorProvider> {
    provider: P,
    closed:   bool,
}

impl<P: SensorProvider> ProviderSession<P> {
    /// Open `provider` and wrap it.
    pub fn open(mut provider: P) -> Result<Self> {
        provider.open()?;
        tracing::info!(provider = provider.name(), "sensor provider opened");
        Ok(Self {
            provider,
            closed: false,
        })
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the provider.  Subsequent calls (and the drop) are no-ops.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.provider.close();
        tracing::info!(provider = self.provider.name(), "sensor provider closed");
    }
}

impl<P: SensorProvider> Drop for ProviderSession<P> {
    fn drop(&mut self) {
        self.close();
    }
}
