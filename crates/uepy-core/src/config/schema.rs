//! Typed settings read from the environment.

use super::env_keys::observability as obv_keys;
use super::loader::{env_bool, env_or};

/// Logging settings: console quiet mode and the tracing filter.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        Self {
            quiet: env_bool(obv_keys::UEPY_QUIET, &[], false),
            log_level: env_or(obv_keys::UEPY_LOG_LEVEL, &[], || "info".to_string()),
        }
    }
}
