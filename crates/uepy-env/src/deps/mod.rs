//! Requirements manifests and pip-driven installation.

pub mod installer;
pub mod requirements;

pub use installer::{InstallReport, Installer, ValidationReport};
pub use requirements::{package_name, parse_requirements};
