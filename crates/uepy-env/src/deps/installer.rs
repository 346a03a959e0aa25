//! pip-driven install and validation.
//!
//! Every call runs `<python> -m pip ...` through a [`CommandRunner`], one at a
//! time. Per-package failures are logged and counted; only a failed pip
//! self-upgrade stops a batch.

use std::path::{Path, PathBuf};

use serde::Serialize;
use uepy_core::config::env_keys::python::PYTHONPATH;
use uepy_core::{BootstrapError, Result};

use super::requirements::{package_name, parse_requirements};
use crate::env::SearchPath;
use crate::runner::{describe, CommandOutput, CommandRunner, SystemRunner};

const PIP_QUIET_FLAGS: &[&str] = &["--disable-pip-version-check", "--progress-bar", "off"];

/// Outcome of installing a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub total: usize,
    pub succeeded: usize,
    /// Specifiers whose install failed, in manifest order.
    pub failed: Vec<String>,
}

impl InstallReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }
}

/// Outcome of checking critical packages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub checked: Vec<String>,
    pub missing: Vec<String>,
}

impl ValidationReport {
    pub fn is_success(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Installs packages with one interpreter's pip.
pub struct Installer<R = SystemRunner> {
    python: PathBuf,
    runner: R,
    target_dir: Option<PathBuf>,
    query_env: Vec<(String, String)>,
}

impl Installer<SystemRunner> {
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self::with_runner(python, SystemRunner)
    }
}

impl<R: CommandRunner> Installer<R> {
    pub fn with_runner(python: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            python: python.into(),
            runner,
            target_dir: None,
            query_env: Vec::new(),
        }
    }

    /// Install into `dir` (`pip install --target`). `pip show` then runs with
    /// `dir` at the front of `PYTHONPATH` so packages there count as installed.
    /// `inherited_pythonpath` is the caller's current `PYTHONPATH`, if any.
    pub fn with_target_dir(
        mut self,
        dir: impl Into<PathBuf>,
        inherited_pythonpath: Option<&str>,
    ) -> Self {
        let dir = dir.into();
        let mut search = inherited_pythonpath
            .map(SearchPath::parse)
            .unwrap_or_default();
        search.prepend(dir.clone());
        self.query_env = vec![(PYTHONPATH.to_string(), search.to_env_value())];
        self.target_dir = Some(dir);
        self
    }

    pub fn target_dir(&self) -> Option<&Path> {
        self.target_dir.as_deref()
    }

    fn pip(&self, args: &[&str], envs: &[(String, String)]) -> std::io::Result<CommandOutput> {
        let mut full = vec!["-m", "pip"];
        full.extend_from_slice(args);
        tracing::debug!("Running {}", describe(&self.python, &full));
        self.runner.run(&self.python, &full, envs)
    }

    /// Whether pip reports the package of `spec` as installed. Any failure to
    /// ask counts as not installed.
    pub fn is_package_installed(&self, spec: &str) -> bool {
        let name = package_name(spec);
        if name.is_empty() {
            return false;
        }
        match self.pip(&["show", "--quiet", name], &self.query_env) {
            Ok(out) => out.success(),
            Err(e) => {
                tracing::warn!("Error checking package {}: {}", name, e);
                false
            }
        }
    }

    /// Install one requirement unless its package is already present.
    ///
    /// Editable lines (`-e ./pkg`) are always passed to pip, split into
    /// arguments. Bare pip options are not requirements and are refused
    /// without running pip; [`install_project_dependencies`] carries them onto
    /// every install instead.
    ///
    /// [`install_project_dependencies`]: Installer::install_project_dependencies
    pub fn install_package(&self, spec: &str) -> bool {
        self.install_with_options(spec, &[])
    }

    fn install_with_options(&self, spec: &str, options: &[&str]) -> bool {
        if is_pip_option(spec) {
            tracing::warn!("Not a requirement, skipping: {}", spec);
            return false;
        }
        let editable = is_editable(spec);
        if !editable && self.is_package_installed(spec) {
            tracing::info!("Package already installed: {}", spec);
            return true;
        }

        tracing::info!("Installing package: {}", spec);
        let mut args = vec!["install"];
        let target = self.target_dir.as_ref().map(|d| d.to_string_lossy().into_owned());
        if let Some(ref target) = target {
            args.push("--target");
            args.push(target);
        }
        args.extend_from_slice(PIP_QUIET_FLAGS);
        args.extend_from_slice(options);
        // A specifier such as `flask ~= 2.0` is one pip argument.
        if editable {
            args.extend(spec.split_whitespace());
        } else {
            args.push(spec);
        }

        match self.pip(&args, &[]) {
            Ok(out) if out.success() => true,
            Ok(out) => {
                tracing::error!("Failed to install {}: {}", spec, out.stderr.trim());
                false
            }
            Err(e) => {
                tracing::error!("Error installing {}: {}", spec, e);
                false
            }
        }
    }

    /// `pip install --upgrade pip`.
    pub fn upgrade_pip(&self) -> Result<()> {
        let args = ["install", "--upgrade", "pip", "--disable-pip-version-check"];
        let mut full = vec!["-m", "pip"];
        full.extend_from_slice(&args);
        let command = describe(&self.python, &full);

        let out = self.pip(&args, &[]).map_err(|e| BootstrapError::CommandFailed {
            command: command.clone(),
            stderr: e.to_string(),
        })?;
        if !out.success() {
            tracing::error!("Failed to upgrade pip: {}", out.stderr.trim());
            return Err(BootstrapError::CommandFailed {
                command,
                stderr: out.stderr.trim().to_string(),
            });
        }
        Ok(())
    }

    /// Install everything `manifest` lists.
    ///
    /// Option lines (`--index-url URL`, `--find-links DIR`, ...) are not
    /// counted; they are passed along with every requirement's install. A
    /// manifest with no requirements is a success. Otherwise pip upgrades
    /// itself first; if that fails the error is returned and nothing is
    /// installed. Each requirement is then installed on its own.
    pub fn install_project_dependencies(&self, manifest: &Path) -> Result<InstallReport> {
        let (options, requirements): (Vec<String>, Vec<String>) =
            parse_requirements(manifest)
                .into_iter()
                .partition(|line| is_pip_option(line));
        if requirements.is_empty() {
            tracing::warn!("No dependencies found to install");
            return Ok(InstallReport::default());
        }
        tracing::info!("Found {} dependencies to install", requirements.len());
        let options: Vec<&str> = options.iter().flat_map(|o| o.split_whitespace()).collect();
        if !options.is_empty() {
            tracing::info!("Using pip options: {}", options.join(" "));
        }

        self.upgrade_pip()?;

        let mut report = InstallReport {
            total: requirements.len(),
            ..Default::default()
        };
        for req in requirements {
            if self.install_with_options(&req, &options) {
                report.succeeded += 1;
            } else {
                report.failed.push(req);
            }
        }

        tracing::info!(
            "Dependency installation summary: {} successful, {} failed",
            report.succeeded,
            report.failure_count()
        );
        Ok(report)
    }

    /// Check that each of `packages` is installed.
    pub fn validate_installation<S: AsRef<str>>(&self, packages: &[S]) -> ValidationReport {
        let mut report = ValidationReport::default();
        for package in packages {
            let package = package.as_ref();
            report.checked.push(package.to_string());
            if !self.is_package_installed(package) {
                report.missing.push(package.to_string());
            }
        }

        if report.is_success() {
            tracing::info!("All critical packages are installed");
        } else {
            tracing::warn!("Critical packages missing: {}", report.missing.join(", "));
        }
        report
    }
}

fn is_editable(line: &str) -> bool {
    line.starts_with("-e ") || line.starts_with("--editable")
}

/// A manifest line that configures pip rather than naming a package.
fn is_pip_option(line: &str) -> bool {
    line.starts_with('-') && !is_editable(line)
}
