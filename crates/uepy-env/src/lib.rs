//! Environment side effects and dependency installation for the project's
//! Python runtime.
//!
//! - `env`: apply `PATHS` / `VARIABLES` / `python_paths` from the setup config
//! - `deps`: requirements manifest parsing and pip-driven install/validate
//! - `runner`: subprocess seam used by `deps`

pub mod deps;
pub mod env;
pub mod runner;
