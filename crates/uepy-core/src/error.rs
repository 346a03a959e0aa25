//! Error type shared by the uepy crates.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while bootstrapping the project's Python runtime.
///
/// Missing files and per-package install failures are not errors: they are
/// logged and degrade to defaults or a `false` result. Only conditions that
/// must stop the bootstrap end up here.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("required environment variable {0} is not set")]
    MissingEnvVar(String),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("no Python interpreter found (set UEPY_PYTHON, UEPY_ENGINE_DIR or put python3 on PATH)")]
    InterpreterNotFound,

    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("{}:{line}: {message}", path.display())]
    ConfigParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BootstrapError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
