pub mod schema;
pub mod watcher;

pub use schema::{
    ChartConfig, ChartsConfig, GlobalConfig, LabelAlign, NotificationMode, OutputFormat,
    PercentLabels, ScaleChoice, TelemonConfig, ThemeConfig,
};
pub use watcher::ConfigWatcher;

use std::path::{Path, PathBuf};
use telemon_core::{Result, TelemonError};

/// Load configuration from a TOML file.  Returns `TelemonConfig::default()`
/// if the file doesn't exist so the monitor always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<TelemonConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(TelemonConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| TelemonError::Config(format!("cannot read '{}': {e}", path.display())))?;

    parse(&raw)
}

/// Parse and validate a TOML document.
pub fn parse(raw: &str) -> Result<TelemonConfig> {
    let config: TelemonConfig =
        toml::from_str(raw).map_err(|e| TelemonError::Config(format!("TOML parse error: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("telemon").join("telemon.toml")
}
