use tracing::warn;

/// Channel for non-fatal errors the user should see.
pub trait Notifier {
    fn notify(&self, summary: &str, body: &str);
}

/// Notifier that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, summary: &str, body: &str) {
        warn!(%summary, "{body}");
    }
}
