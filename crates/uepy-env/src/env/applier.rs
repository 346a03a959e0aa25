//! Apply the setup config to an environment.

use std::path::PathBuf;

use uepy_core::config::env_keys::python::PYTHONPATH;
use uepy_core::setup_config::{keys, resolve_path_value, sections, substitute};
use uepy_core::{Configuration, ProjectContext};

use super::search_path::SearchPath;
use super::sink::EnvSink;

/// Applies `PATHS`, `VARIABLES` and `python_paths` to an [`EnvSink`].
///
/// The search path starts from the sink's current `PYTHONPATH`, so a second
/// applier over the same environment sees what the first one added.
pub struct EnvironmentApplier<'a, E: EnvSink> {
    ctx: &'a ProjectContext,
    env: E,
    search_path: SearchPath,
}

impl<'a, E: EnvSink> EnvironmentApplier<'a, E> {
    pub fn new(ctx: &'a ProjectContext, env: E) -> Self {
        let search_path = env
            .get(PYTHONPATH)
            .map(|v| SearchPath::parse(&v))
            .unwrap_or_default();
        Self {
            ctx,
            env,
            search_path,
        }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    pub fn into_env(self) -> E {
        self.env
    }

    /// Run all three steps in order: paths, variables, search path.
    pub fn apply(&mut self, config: &Configuration) {
        self.setup_environment_paths(config);
        self.setup_environment_vars(config);
        self.setup_python_path(config);
    }

    /// Every `PATHS` key except `python_paths` names a directory: expand it,
    /// make it absolute, create it, and export `KEY=<dir>`.
    ///
    /// A directory that cannot be created is logged and its variable left
    /// unset. Returns the directories exported.
    pub fn setup_environment_paths(&mut self, config: &Configuration) -> Vec<PathBuf> {
        let Some(section) = config.section(sections::PATHS) else {
            return Vec::new();
        };
        tracing::info!("Setting environment paths...");

        let mut exported = Vec::new();
        for (key, value) in section.iter() {
            if key.eq_ignore_ascii_case(keys::PYTHON_PATHS) {
                continue;
            }
            let dir = resolve_path_value(value, self.ctx);
            if !dir.is_dir() {
                if let Err(e) = std::fs::create_dir_all(&dir) {
                    tracing::error!("Failed to create {} for {}: {}", dir.display(), key, e);
                    continue;
                }
                tracing::info!("  Created {}", dir.display());
            }
            let value = dir.to_string_lossy();
            self.env.set(key, &value);
            tracing::info!("  {} = {}", key, value);
            exported.push(dir);
        }
        exported
    }

    /// Export every `VARIABLES` entry after placeholder expansion.
    pub fn setup_environment_vars(&mut self, config: &Configuration) {
        let Some(section) = config.section(sections::VARIABLES) else {
            return;
        };
        tracing::info!("Setting environment variables...");

        for (key, value) in section.iter() {
            let value = substitute(value, self.ctx);
            self.env.set(key, &value);
            tracing::info!("  {} = {}", key, value);
        }
    }

    /// Append the existing directories listed in `PATHS.python_paths`
    /// (`;`-separated, relative to the project root) to the search path and
    /// export it as `PYTHONPATH`. Returns the directories newly added.
    pub fn setup_python_path(&mut self, config: &Configuration) -> Vec<PathBuf> {
        let Some(list) = config.get(sections::PATHS, keys::PYTHON_PATHS) else {
            return Vec::new();
        };

        let mut added = Vec::new();
        for segment in list.split(|c: char| c == ';' || c == '\n') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let path = resolve_path_value(segment, self.ctx);
            if !path.is_dir() {
                tracing::warn!("Python path does not exist: {}", path.display());
                continue;
            }
            if self.search_path.push_unique(path.clone()) {
                added.push(path);
            }
        }

        if !self.search_path.is_empty() {
            let value = self.search_path.to_env_value();
            self.env.set(PYTHONPATH, &value);
        }
        if !added.is_empty() {
            let shown: Vec<String> = added.iter().map(|p| p.display().to_string()).collect();
            tracing::info!("Added to Python path: {}", shown.join(", "));
        }
        added
    }
}
