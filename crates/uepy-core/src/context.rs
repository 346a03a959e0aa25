//! Project context: root locations, host mode and the cached interpreter.
//!
//! Built once per run and passed by reference to everything that needs a
//! project path. Nothing here is global.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use crate::config::env_keys::{paths as path_keys, runtime as runtime_keys};
use crate::config::{env_bool, env_optional};
use crate::error::{BootstrapError, Result};
use crate::runtime;

/// Log file written under the project log directory.
pub const LOG_FILE_NAME: &str = "python_setup.log";

/// How the bootstrap was launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostMode {
    /// Run from a shell: the outcome becomes the process exit status.
    #[default]
    Standalone,
    /// Run by the editor: the outcome is reported back, exit status stays 0.
    Embedded,
}

/// Overrides collected from the command line. Unset fields fall back to
/// environment variables, then to editor layout defaults.
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    pub project_dir: Option<PathBuf>,
    pub content_dir: Option<PathBuf>,
    pub engine_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub python: Option<PathBuf>,
    pub embedded: bool,
}

impl ContextOptions {
    /// Resolve into a [`ProjectContext`].
    ///
    /// Fails with [`BootstrapError::MissingEnvVar`] when no project directory
    /// was given and `UEPY_PROJECT_DIR` is unset.
    pub fn resolve(self) -> Result<ProjectContext> {
        let project_root = self
            .project_dir
            .or_else(|| {
                env_optional(path_keys::UEPY_PROJECT_DIR, path_keys::PROJECT_DIR_ALIASES)
                    .map(PathBuf::from)
            })
            .ok_or_else(|| BootstrapError::MissingEnvVar(path_keys::UEPY_PROJECT_DIR.into()))?;
        let project_root = absolutize(&project_root);

        let mut ctx = ProjectContext::new(project_root);
        if let Some(dir) = self
            .content_dir
            .or_else(|| env_optional(path_keys::UEPY_CONTENT_DIR, &[]).map(PathBuf::from))
        {
            ctx.content_dir = ctx.project_root.join(dir);
        }
        if let Some(dir) = self
            .log_dir
            .or_else(|| env_optional(path_keys::UEPY_LOG_DIR, &[]).map(PathBuf::from))
        {
            ctx.log_dir = ctx.project_root.join(dir);
        }
        ctx.engine_dir = self.engine_dir.or_else(|| {
            env_optional(path_keys::UEPY_ENGINE_DIR, path_keys::ENGINE_DIR_ALIASES)
                .map(PathBuf::from)
        });
        ctx.python_override = self.python.or_else(|| {
            env_optional(runtime_keys::UEPY_PYTHON, runtime_keys::PYTHON_ALIASES)
                .map(PathBuf::from)
        });
        if self.embedded || env_bool(runtime_keys::UEPY_EMBEDDED, &[], false) {
            ctx.host = HostMode::Embedded;
        }
        Ok(ctx)
    }
}

/// Resolved project locations for one bootstrap run.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    project_root: PathBuf,
    content_dir: PathBuf,
    log_dir: PathBuf,
    engine_dir: Option<PathBuf>,
    python_override: Option<PathBuf>,
    host: HostMode,
    interpreter: OnceCell<PathBuf>,
}

impl ProjectContext {
    /// Context with the editor's default layout under `project_root`:
    /// `Content/` for content and `Saved/Logs/` for logs.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            content_dir: project_root.join("Content"),
            log_dir: project_root.join("Saved").join("Logs"),
            project_root,
            engine_dir: None,
            python_override: None,
            host: HostMode::Standalone,
            interpreter: OnceCell::new(),
        }
    }

    pub fn with_content_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.content_dir = dir.into();
        self
    }

    pub fn with_engine_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.engine_dir = Some(dir.into());
        self.interpreter = OnceCell::new();
        self
    }

    pub fn with_interpreter(mut self, python: impl Into<PathBuf>) -> Self {
        self.python_override = Some(python.into());
        self.interpreter = OnceCell::new();
        self
    }

    pub fn with_host(mut self, host: HostMode) -> Self {
        self.host = host;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// `<content>/Python`, the base for relative config and manifest paths.
    pub fn python_dir(&self) -> PathBuf {
        self.content_dir.join("Python")
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }

    pub fn engine_dir(&self) -> Option<&Path> {
        self.engine_dir.as_deref()
    }

    pub fn host(&self) -> HostMode {
        self.host
    }

    /// The Python interpreter for this project, resolved on first use.
    pub fn interpreter(&self) -> Result<&Path> {
        if let Some(python) = self.interpreter.get() {
            return Ok(python.as_path());
        }
        let python = runtime::resolve_interpreter(
            self.python_override.as_deref(),
            self.engine_dir.as_deref(),
        )?;
        tracing::debug!("Using Python interpreter {}", python.display());
        Ok(self.interpreter.get_or_init(|| python).as_path())
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
