//! Tracing subscriber setup.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::LoggingError;

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the crate logs at `level`. Output
/// goes to `file` (appended) when given, stderr otherwise.
///
/// # Errors
///
/// Returns `LoggingError::File` if the log file cannot be opened, or
/// `LoggingError::Init` if a global subscriber is already installed.
pub fn init(level: &str, file: Option<&Path>) -> Result<(), LoggingError> {
    let filter = build_env_filter(level);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    result.map_err(|e| LoggingError::Init(e.to_string()))?;

    tracing::debug!(level, file = ?file, "logging initialized");
    Ok(())
}

/// Installs the subscriber described by a [`LoggingConfig`].
///
/// # Errors
///
/// Same as [`init`].
pub fn init_from_config(config: &LoggingConfig) -> Result<(), LoggingError> {
    init(&config.level, config.file.as_deref())
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("energy_tracker={level}")))
}
