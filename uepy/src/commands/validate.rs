use std::path::PathBuf;

use anyhow::Result;
use uepy_core::setup_config::{critical_packages, load_config};
use uepy_core::ProjectContext;
use uepy_env::env::ProcessEnv;

use super::prepare_installer;

/// `uepy validate`
///
/// Applies the configured environment first so `pip show` sees packages
/// that `setup` installed into `PIP_TARGET_DIR`.
pub fn cmd_validate(
    ctx: &ProjectContext,
    config_file: Option<PathBuf>,
    packages: Vec<String>,
    json: bool,
) -> Result<bool> {
    let config = load_config(ctx, config_file.as_deref());
    let packages = if packages.is_empty() {
        critical_packages(&config)
    } else {
        packages
    };
    let installer = prepare_installer(ctx, &config, ProcessEnv)?;
    let report = installer.validate_installation(packages.as_slice());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for package in &report.checked {
            let mark = if report.missing.contains(package) { "✗" } else { "✓" };
            eprintln!("  {} {}", mark, package);
        }
    }
    Ok(report.is_success())
}
