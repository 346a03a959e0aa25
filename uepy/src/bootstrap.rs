//! The end-to-end setup flow.

use std::path::PathBuf;

use anyhow::{Context, Result};
use uepy_core::config::env_keys::python::{PIP_TARGET_DIR, PYTHONPATH};
use uepy_core::setup_config::{critical_packages, interpreter_for, load_config, requirements_path};
use uepy_core::{BootstrapError, ProjectContext};
use uepy_env::deps::{InstallReport, Installer, ValidationReport};
use uepy_env::env::{EnvSink, EnvironmentApplier, ProcessEnv};
use uepy_env::runner::{CommandRunner, SystemRunner};

#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    /// Config file; `None` means `<content>/Python/setup_config.ini`.
    pub config_file: Option<PathBuf>,
    /// Check the critical packages after installing.
    pub validate: bool,
}

/// What one setup run did.
#[derive(Debug, Clone, Default)]
pub struct SetupOutcome {
    pub install: InstallReport,
    pub validation: Option<ValidationReport>,
}

impl SetupOutcome {
    /// Setup succeeds when every requirement installed. Validation results
    /// are reported but do not change the outcome.
    pub fn is_success(&self) -> bool {
        self.install.is_success()
    }
}

/// Run setup against the real process environment and pip.
///
/// Fatal errors are logged with their full cause chain and reported as
/// `false`.
pub fn run_setup(ctx: &ProjectContext, opts: &SetupOptions) -> bool {
    match try_setup(ctx, opts, SystemRunner, ProcessEnv) {
        Ok(outcome) => outcome.is_success(),
        Err(e) => {
            tracing::error!("Project setup failed: {:#}", e);
            tracing::error!("{:?}", e);
            false
        }
    }
}

pub fn try_setup<R: CommandRunner, E: EnvSink>(
    ctx: &ProjectContext,
    opts: &SetupOptions,
    runner: R,
    env: E,
) -> Result<SetupOutcome> {
    tracing::info!("Starting Python environment setup...");
    tracing::info!("Project root: {}", ctx.project_root().display());

    let config = load_config(ctx, opts.config_file.as_deref());

    let mut applier = EnvironmentApplier::new(ctx, env);
    applier.apply(&config);

    let target = applier
        .env()
        .get(PIP_TARGET_DIR)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| BootstrapError::MissingEnvVar(PIP_TARGET_DIR.to_string()))?;
    let pythonpath = applier.env().get(PYTHONPATH);

    let python = interpreter_for(ctx, &config).context("Resolving Python interpreter")?;
    let installer = Installer::with_runner(python, runner)
        .with_target_dir(PathBuf::from(target), pythonpath.as_deref());

    let manifest = requirements_path(ctx, &config);
    let install = if manifest.is_file() {
        installer
            .install_project_dependencies(&manifest)
            .with_context(|| format!("Installing dependencies from {}", manifest.display()))?
    } else {
        tracing::info!(
            "No requirements manifest at {}, skipping install",
            manifest.display()
        );
        InstallReport::default()
    };

    let validation = opts
        .validate
        .then(|| installer.validate_installation(critical_packages(&config).as_slice()));

    if install.is_success() {
        tracing::info!("Python environment setup completed");
    } else {
        tracing::error!(
            "Python environment setup finished with {} failed package(s)",
            install.failure_count()
        );
    }
    Ok(SetupOutcome {
        install,
        validation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::path::Path;
    use uepy_env::env::MemoryEnv;
    use uepy_env::runner::CommandOutput;

    /// Fake pip: `show` answers from `installed`, `install` succeeds unless
    /// the package is in `broken`.
    #[derive(Default)]
    struct FakeRunner {
        installed: HashSet<String>,
        broken: HashSet<String>,
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl FakeRunner {
        fn output(ok: bool) -> CommandOutput {
            CommandOutput {
                code: Some(if ok { 0 } else { 1 }),
                stdout: String::new(),
                stderr: if ok { String::new() } else { "boom".into() },
            }
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(
            &self,
            _program: &Path,
            args: &[&str],
            _envs: &[(String, String)],
        ) -> std::io::Result<CommandOutput> {
            let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
            self.calls.borrow_mut().push(args.clone());
            let last = args.last().cloned().unwrap_or_default();
            let ok = match args.get(2).map(String::as_str) {
                Some("show") => self.installed.contains(&last),
                Some("install") => !self.broken.contains(&last),
                _ => true,
            };
            Ok(Self::output(ok))
        }
    }

    fn project() -> (tempfile::TempDir, ProjectContext) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ProjectContext::new(dir.path()).with_interpreter("/usr/bin/python3");
        std::fs::create_dir_all(ctx.python_dir()).unwrap();
        (dir, ctx)
    }

    fn write_manifest(ctx: &ProjectContext, body: &str) {
        std::fs::write(ctx.python_dir().join("requirements.txt"), body).unwrap();
    }

    #[test]
    fn test_setup_installs_into_target_dir() {
        let (_dir, ctx) = project();
        write_manifest(&ctx, "numpy>=1.20\nrequests\n");
        let runner = FakeRunner {
            installed: ["requests".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let mut env = MemoryEnv::new();

        let outcome = try_setup(&ctx, &SetupOptions::default(), &runner, &mut env).unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.install.total, 2);
        assert!(outcome.validation.is_none());

        let target = ctx.content_dir().join("Python/Lib/site-packages");
        assert!(target.is_dir());
        assert_eq!(env.get(PIP_TARGET_DIR).map(PathBuf::from), Some(target.clone()));

        let calls = runner.calls.borrow();
        let numpy_install = calls
            .iter()
            .find(|c| {
                c.get(2).map(String::as_str) == Some("install")
                    && c.last().map(String::as_str) == Some("numpy>=1.20")
            })
            .expect("numpy install call");
        assert!(numpy_install.contains(&"--target".to_string()));
        assert!(numpy_install.contains(&target.to_string_lossy().to_string()));
    }

    #[test]
    fn test_failed_package_fails_setup() {
        let (_dir, ctx) = project();
        write_manifest(&ctx, "numpy\nbadpkg\n");
        let runner = FakeRunner {
            broken: ["badpkg".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let outcome =
            try_setup(&ctx, &SetupOptions::default(), &runner, MemoryEnv::new()).unwrap();
        assert!(!outcome.is_success());
        assert_eq!(outcome.install.failed, vec!["badpkg".to_string()]);
    }

    #[test]
    fn test_missing_manifest_is_not_an_error() {
        let (_dir, ctx) = project();
        let runner = FakeRunner::default();
        let outcome =
            try_setup(&ctx, &SetupOptions::default(), &runner, MemoryEnv::new()).unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.install.total, 0);
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_validation_is_reported_not_fatal() {
        let (_dir, ctx) = project();
        let runner = FakeRunner {
            installed: ["numpy".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let opts = SetupOptions {
            validate: true,
            ..Default::default()
        };
        let outcome = try_setup(&ctx, &opts, &runner, MemoryEnv::new()).unwrap();
        assert!(outcome.is_success());
        let validation = outcome.validation.unwrap();
        assert_eq!(
            validation.missing,
            vec!["pandas".to_string(), "requests".to_string()]
        );
    }

    #[test]
    fn test_missing_target_dir_is_fatal() {
        let (_dir, ctx) = project();
        // A regular file in the way makes the target directory uncreatable.
        std::fs::write(ctx.project_root().join("blocker"), "").unwrap();
        let config = ctx.python_dir().join("custom.ini");
        std::fs::write(&config, "[PATHS]\nPIP_TARGET_DIR = blocker/site-packages\n").unwrap();
        let opts = SetupOptions {
            config_file: Some(config),
            validate: false,
        };
        let err = try_setup(&ctx, &opts, FakeRunner::default(), MemoryEnv::new()).unwrap_err();
        let err = err.downcast_ref::<BootstrapError>().unwrap();
        assert!(matches!(err, BootstrapError::MissingEnvVar(v) if v == PIP_TARGET_DIR));
    }
}
