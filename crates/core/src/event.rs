/// Messages that drive the shell's tick loop.
///
/// Sources:
/// - Interval timer      → `Tick`
/// - Config watcher task → `ConfigReloaded`
/// - Ctrl-C / SIGTERM    → `Shutdown`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// One sampling-and-render cycle is due.
    Tick,
    /// Config file changed on disk; triggers a live reload.
    ConfigReloaded,
    /// Graceful shutdown requested.
    Shutdown,
}
