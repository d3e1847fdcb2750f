//! telemon: scrolling hardware telemetry charts.
//!
//! Run with:  `RUST_LOG=info telemon [path/to/telemon.toml]`

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Structured logging; RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("telemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(telemon_config::default_path);

    telemon_shell::run(config_path.clone())
        .with_context(|| format!("telemon failed (config: {})", config_path.display()))
}
