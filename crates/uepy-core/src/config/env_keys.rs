//! Environment variable names.
//!
//! Primary names use the `UEPY_*` prefix; aliases accept the variables the
//! editor itself exports.

/// Project and engine locations.
pub mod paths {
    pub const UEPY_PROJECT_DIR: &str = "UEPY_PROJECT_DIR";
    /// `UE_PROJECT` is exported by the default `VARIABLES` section, so a
    /// nested run picks up the parent's project.
    pub const PROJECT_DIR_ALIASES: &[&str] = &["UE_PROJECT"];

    pub const UEPY_CONTENT_DIR: &str = "UEPY_CONTENT_DIR";

    pub const UEPY_ENGINE_DIR: &str = "UEPY_ENGINE_DIR";
    pub const ENGINE_DIR_ALIASES: &[&str] = &["UE_ENGINE_DIR"];

    pub const UEPY_LOG_DIR: &str = "UEPY_LOG_DIR";
}

/// Interpreter and host integration.
pub mod runtime {
    pub const UEPY_PYTHON: &str = "UEPY_PYTHON";
    pub const PYTHON_ALIASES: &[&str] = &["UE_PYTHON_EXECUTABLE"];

    /// `1` when launched by the editor: report the result instead of exiting non-zero.
    pub const UEPY_EMBEDDED: &str = "UEPY_EMBEDDED";

    pub const UEPY_CONFIG: &str = "UEPY_CONFIG";
}

/// Logging.
pub mod observability {
    pub const UEPY_QUIET: &str = "UEPY_QUIET";
    pub const UEPY_LOG_LEVEL: &str = "UEPY_LOG_LEVEL";
}

/// Variables uepy exports to the Python side.
pub mod python {
    pub const PIP_TARGET_DIR: &str = "PIP_TARGET_DIR";
    pub const PYTHONPATH: &str = "PYTHONPATH";
}
