use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum TelemonError {
    #[error("config error: {0}")]
    Config(String),

    #[error("sensor provider error: {0}")]
    Provider(String),

    #[error("surface error: {0}")]
    Surface(String),

    #[error("notification error: {0}")]
    Notify(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = TelemonError> = std::result::Result<T, E>;
