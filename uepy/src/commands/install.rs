use std::path::PathBuf;

use anyhow::Result;
use uepy_core::setup_config::{load_config, requirements_path};
use uepy_core::ProjectContext;
use uepy_env::env::ProcessEnv;

use super::prepare_installer;

/// `uepy install [MANIFEST]`
///
/// Applies the configured environment first so `--target` and `PYTHONPATH`
/// match what `setup` would use.
pub fn cmd_install(
    ctx: &ProjectContext,
    config_file: Option<PathBuf>,
    manifest: Option<PathBuf>,
) -> Result<bool> {
    let config = load_config(ctx, config_file.as_deref());
    let manifest = match manifest {
        Some(m) if m.is_absolute() => m,
        Some(m) => ctx.python_dir().join(m),
        None => requirements_path(ctx, &config),
    };
    let installer = prepare_installer(ctx, &config, ProcessEnv)?;
    let report = installer.install_project_dependencies(&manifest)?;

    eprintln!(
        "{}: {} installed, {} failed",
        manifest.display(),
        report.succeeded,
        report.failure_count()
    );
    for spec in &report.failed {
        eprintln!("  ✗ {}", spec);
    }
    Ok(report.is_success())
}
