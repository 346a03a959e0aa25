//! uepy: bootstrap a project's Python runtime.
//!
//! The `setup` flow loads `setup_config.ini`, applies its paths and variables
//! to the process environment, installs the requirements manifest with pip
//! and checks that the critical packages import.

pub mod bootstrap;
pub mod cli;
pub mod commands;

pub use bootstrap::{run_setup, try_setup, SetupOptions, SetupOutcome};
