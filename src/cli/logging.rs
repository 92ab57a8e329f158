//! Logging initialization

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize logging
///
/// Diagnostics go to stderr so they never mix with the describe document on
/// stdout. Warnings are always shown; `debug` raises the level and adds
/// source locations. `RUST_LOG` overrides the level either way. When
/// `log_file` is given, output goes there instead of stderr.
///
/// A subscriber is always installed. If the log file cannot be opened,
/// logging falls back to stderr and the open error is returned.
pub fn init_logging(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .with_file(debug)
        .with_line_number(debug);

    match log_file.map(open_log_file).transpose() {
        Ok(Some(file)) => {
            builder
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false) // No ANSI codes in log file
                .init();
            Ok(())
        }
        Ok(None) => {
            builder.with_writer(std::io::stderr).without_time().init();
            Ok(())
        }
        Err(e) => {
            builder.with_writer(std::io::stderr).without_time().init();
            Err(e.context("Logging to stderr instead"))
        }
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}
