//! Tracing setup.
//!
//! The TUI owns stdout/stderr while it runs, so log events go to a file:
//! `salesdash.log` in the working directory unless `SALESDASH_LOG` names
//! another path. The level comes from `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::AppError;

pub const DEFAULT_LOG_FILE: &str = "salesdash.log";

/// Resolve the log file path from the environment.
pub fn log_path() -> PathBuf {
    std::env::var_os("SALESDASH_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn initialize() -> Result<(), AppError> {
    let path = log_path();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| {
            AppError::new(4, format!("Cannot create log directory {}: {e}", dir.display()))
        })?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| AppError::new(4, format!("Cannot open log file {}: {e}", path.display())))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Already initialized (tests, repeated calls) is fine.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false),
        )
        .try_init();

    tracing::info!(log = %path.display(), "logging initialized");
    Ok(())
}
