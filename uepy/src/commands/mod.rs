//! One module per subcommand. Human-readable output goes to stderr, machine
//! output (`--json`, `parse`) to stdout.

pub mod config;
pub mod install;
pub mod parse;
pub mod setup;
pub mod validate;

use anyhow::{Context, Result};
use uepy_core::config::env_keys::python::{PIP_TARGET_DIR, PYTHONPATH};
use uepy_core::setup_config::interpreter_for;
use uepy_core::{Configuration, ProjectContext};
use uepy_env::deps::Installer;
use uepy_env::env::{EnvSink, EnvironmentApplier};

/// Apply `config` to `env`, then build an installer that targets the
/// configured `PIP_TARGET_DIR` and sees it on `PYTHONPATH`.
pub(crate) fn prepare_installer<E: EnvSink>(
    ctx: &ProjectContext,
    config: &Configuration,
    env: E,
) -> Result<Installer> {
    let mut applier = EnvironmentApplier::new(ctx, env);
    applier.apply(config);
    installer_for(ctx, config, applier.env())
}

fn installer_for<E: EnvSink>(
    ctx: &ProjectContext,
    config: &Configuration,
    env: &E,
) -> Result<Installer> {
    let python = interpreter_for(ctx, config).context("Resolving Python interpreter")?;
    let installer = Installer::new(python);
    Ok(match env.get(PIP_TARGET_DIR).filter(|v| !v.trim().is_empty()) {
        Some(target) => installer.with_target_dir(target, env.get(PYTHONPATH).as_deref()),
        None => installer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uepy_core::setup_config::load_config;
    use uepy_env::env::MemoryEnv;

    #[test]
    fn test_prepared_installer_targets_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ProjectContext::new(dir.path()).with_interpreter("/usr/bin/python3");
        let config = load_config(&ctx, None);

        let mut env = MemoryEnv::new();
        let installer = prepare_installer(&ctx, &config, &mut env).unwrap();

        let target = ctx.content_dir().join("Python/Lib/site-packages");
        assert_eq!(installer.target_dir(), Some(target.as_path()));
        assert!(target.is_dir());
        assert_eq!(
            env.get(PIP_TARGET_DIR).map(std::path::PathBuf::from),
            Some(target)
        );
    }
}
