use chrono::{DateTime, Local};
use std::collections::HashMap;
use telemon_core::{Result, TelemonError};
use telemon_pipeline::Notifier;
use tracing::{debug, warn};
use zbus::zvariant::Value;

/// Milliseconds a desktop notification stays on screen.
const EXPIRE_MS: i32 = 5_000;

#[zbus::proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications",
    gen_blocking = false
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: &HashMap<&str, &Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

/// Sends notifications to the desktop's notification daemon over the
/// session bus.  Each notification is delivered from its own task so a slow
/// daemon never stalls the tick loop.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    connection: zbus::Connection,
}

impl DesktopNotifier {
    pub async fn connect() -> Result<Self> {
        let connection = zbus::Connection::session()
            .await
            .map_err(|e| TelemonError::Notify(format!("session bus unavailable: {e}")))?;
        Ok(Self { connection })
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, summary: &str, body: &str) {
        let body = stamped(body, Local::now());
        warn!(%summary, "{body}");

        let connection = self.connection.clone();
        let summary = summary.to_string();
        tokio::spawn(async move {
            match send(&connection, &summary, &body).await {
                Ok(id) => debug!(id, "desktop notification sent"),
                Err(e) => warn!("desktop notification failed: {e}"),
            }
        });
    }
}

async fn send(connection: &zbus::Connection, summary: &str, body: &str) -> zbus::Result<u32> {
    let proxy = NotificationsProxy::new(connection).await?;
    proxy
        .notify("telemon", 0, "", summary, body, &[], &HashMap::new(), EXPIRE_MS)
        .await
}

/// Prefix `body` with the local wall-clock time.
fn stamped(body: &str, at: DateTime<Local>) -> String {
    format!("[{}] {body}", at.format("%H:%M:%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn body_is_time_stamped() {
        let at = Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(
            stamped("Error updating hardware info: timeout", at),
            "[09:26:53] Error updating hardware info: timeout"
        );
    }
}
