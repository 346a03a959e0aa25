//! Environment applier: turns the setup config's `PATHS`, `VARIABLES` and
//! `python_paths` into environment variables, directories and the module
//! search path handed to the interpreter.
//!
//! All writes are additive and repeatable: running the applier twice leaves
//! the same state as running it once.

pub mod applier;
pub mod search_path;
pub mod sink;

pub use applier::EnvironmentApplier;
pub use search_path::SearchPath;
pub use sink::{EnvSink, MemoryEnv, ProcessEnv};
