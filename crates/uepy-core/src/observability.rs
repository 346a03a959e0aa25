//! Logging: a plain-text log file plus the host channel.
//!
//! Every event goes to `<log_dir>/python_setup.log` as
//! `YYYY-MM-DD HH:MM:SS LEVEL message` and is mirrored to the host by
//! severity: WARN/ERROR on stderr, everything else on stdout. The editor picks
//! up both streams into its own log.
//!
//! `UEPY_LOG_LEVEL` sets the filter (default `info`); `UEPY_QUIET=1` drops
//! host output below WARN. The file always receives the full filtered stream.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::error::{BootstrapError, Result};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Install the global subscriber. Call once at startup.
///
/// `log_file` is created (with its parent directory) and appended to. A
/// second call in the same process is a no-op.
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let cfg = ObservabilityConfig::from_env();
    let filter = EnvFilter::try_new(&cfg.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| BootstrapError::io(parent, e))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| BootstrapError::io(path, e))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    };

    let (host_layer, quiet_host_layer) = if cfg.quiet {
        let writer = std::io::stderr.with_max_level(Level::WARN);
        let layer = fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .with_writer(writer);
        (None, Some(layer))
    } else {
        let writer = std::io::stderr
            .with_max_level(Level::WARN)
            .or_else(std::io::stdout);
        let layer = fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .with_writer(writer);
        (Some(layer), None)
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(host_layer)
        .with(quiet_host_layer)
        .try_init();

    tracing::debug!("Logging initialized");
    Ok(())
}
