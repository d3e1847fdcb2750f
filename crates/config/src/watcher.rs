use notify::event::ModifyKind;
use notify::{Event, EventKind};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, warn};

/// Quiet period after the first change event.  Everything that arrives
/// inside it is folded into the same reload.
const DEBOUNCE: Duration = Duration::from_millis(200);

/// Watches the config file for changes and sends one notification per save.
///
/// The parent directory is watched rather than the file itself so that editors
/// which replace the file (write-to-temp + rename) are still picked up.  A
/// single save raises several events (truncate, write, close); they are
/// debounced into one.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// let (_watcher, mut rx) = telemon_config::ConfigWatcher::spawn("/home/user/.config/telemon/telemon.toml");
/// while rx.recv().await.is_some() {
///     println!("config changed, reloading");
/// }
/// # }
/// ```
pub struct ConfigWatcher {
    path: PathBuf,
}

impl ConfigWatcher {
    /// Spawn a filesystem watcher for `path`.
    /// Returns the watcher handle and a receiver that fires once per detected change.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();
        let watcher = Self { path: path.clone() };

        tokio::spawn(watch_loop(path, tx));

        (watcher, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<()>) {
    use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};

    let (sync_tx, mut sync_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = sync_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return;
        }
    };

    let dir = match path.parent() {
        Some(dir) if dir.exists() => dir.to_path_buf(),
        _ => {
            warn!("Config directory for '{}' does not exist; live reload disabled", path.display());
            return;
        }
    };

    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        error!("Failed to watch '{}': {e}", dir.display());
        return;
    }

    info!("Watching config file: {}", path.display());

    while let Some(event) = sync_rx.recv().await {
        match event {
            Ok(e) if is_content_change(&e, &path) => {
                tokio::time::sleep(DEBOUNCE).await;
                while sync_rx.try_recv().is_ok() {}

                match tx.try_send(()) {
                    Ok(()) => debug!("Config change detected: {}", path.display()),
                    // a reload is already pending and will read the latest file
                    Err(TrySendError::Full(())) => {}
                    Err(TrySendError::Closed(())) => break,
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Watcher error: {e}"),
        }
    }
}

/// Data writes, renames onto the path, and creation count.  Metadata and
/// access events do not.
fn is_content_change(event: &Event, path: &Path) -> bool {
    let kind = matches!(
        event.kind,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_)) | EventKind::Create(_)
    );
    kind && event.paths.iter().any(|p| p == path)
}
