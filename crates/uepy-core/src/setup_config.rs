//! Layered setup configuration: built-in defaults overlaid by the project's
//! `setup_config.ini`, with `${PROJECT_ROOT}` / `${CONTENT_DIR}` expanded
//! when a value is used.

use std::path::{Path, PathBuf};

use crate::context::ProjectContext;
use crate::error::{BootstrapError, Result};
use crate::configuration::{self, Configuration};

pub const DEFAULT_CONFIG_FILE: &str = "setup_config.ini";
pub const DEFAULT_REQUIREMENTS_FILE: &str = "requirements.txt";

pub const PROJECT_ROOT_TOKEN: &str = "${PROJECT_ROOT}";
pub const CONTENT_DIR_TOKEN: &str = "${CONTENT_DIR}";

/// Section names.
pub mod sections {
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    pub const DEPENDENCIES: &str = "DEPENDENCIES";
    pub const PATHS: &str = "PATHS";
    pub const VARIABLES: &str = "VARIABLES";
}

/// Well-known keys.
pub mod keys {
    pub const PYTHON_PATH: &str = "python_path";
    pub const PROJECT_ROOT: &str = "project_root";
    pub const CONTENT_DIR: &str = "content_dir";
    pub const REQUIREMENTS_FILE: &str = "requirements_file";
    pub const CRITICAL_PACKAGES: &str = "critical_packages";
    pub const PYTHON_PATHS: &str = "python_paths";
}

/// Packages whose absence `validate` reports when the config names none.
pub const DEFAULT_CRITICAL_PACKAGES: &[&str] = &["numpy", "pandas", "requests"];

/// Built-in configuration for `ctx`.
pub fn default_config(ctx: &ProjectContext) -> Configuration {
    use sections::*;

    let python = match ctx.interpreter() {
        Ok(p) => display_path(p),
        Err(e) => {
            tracing::debug!("No default python_path: {}", e);
            String::new()
        }
    };

    let mut cfg = Configuration::new();
    cfg.set(ENVIRONMENT, keys::PYTHON_PATH, python);
    cfg.set(ENVIRONMENT, keys::PROJECT_ROOT, display_path(ctx.project_root()));
    cfg.set(ENVIRONMENT, keys::CONTENT_DIR, display_path(ctx.content_dir()));

    cfg.set(DEPENDENCIES, keys::REQUIREMENTS_FILE, DEFAULT_REQUIREMENTS_FILE);
    cfg.set(
        DEPENDENCIES,
        keys::CRITICAL_PACKAGES,
        DEFAULT_CRITICAL_PACKAGES.join(","),
    );

    cfg.set(PATHS, "PIP_TARGET_DIR", "${CONTENT_DIR}/Python/Lib/site-packages");
    cfg.set(
        PATHS,
        keys::PYTHON_PATHS,
        "Content/Python/Scripts;Content/Python/Libs",
    );

    cfg.set(VARIABLES, "UE_PROJECT", PROJECT_ROOT_TOKEN);
    cfg.set(VARIABLES, "PYTHON_DEBUG", "1");
    cfg
}

/// Where a config file named `path` lives: absolute paths as given,
/// relative ones under `<content>/Python/`.
pub fn resolve_config_path(ctx: &ProjectContext, path: Option<&Path>) -> PathBuf {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        ctx.python_dir().join(path)
    }
}

/// Defaults overlaid with the on-disk file, if any.
///
/// A missing file yields the defaults. An unreadable or malformed file is
/// logged and ignored as a whole; this never fails.
pub fn load_config(ctx: &ProjectContext, path: Option<&Path>) -> Configuration {
    let mut config = default_config(ctx);
    let path = resolve_config_path(ctx, path);
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return config;
    }
    match read_overlay(&path) {
        Ok(overlay) => {
            config.overlay(overlay);
            tracing::info!("Loaded config from {}", path.display());
        }
        Err(e) => tracing::error!("Error loading config file: {}", e),
    }
    config
}

fn read_overlay(path: &Path) -> Result<Configuration> {
    let content = std::fs::read_to_string(path).map_err(|e| BootstrapError::io(path, e))?;
    configuration::parse(&content).map_err(|e| BootstrapError::ConfigParse {
        path: path.to_path_buf(),
        line: e.line,
        message: e.message,
    })
}

/// Expand `${PROJECT_ROOT}` and `${CONTENT_DIR}` in `value`.
///
/// Single left-to-right pass, so a root path that itself contains a token is
/// never expanded again. Other `${...}` sequences are left untouched.
pub fn substitute(value: &str, ctx: &ProjectContext) -> String {
    let project = display_path(ctx.project_root());
    let content = display_path(ctx.content_dir());

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(idx) = rest.find("${") {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        if let Some(after) = tail.strip_prefix(PROJECT_ROOT_TOKEN) {
            out.push_str(&project);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(CONTENT_DIR_TOKEN) {
            out.push_str(&content);
            rest = after;
        } else {
            out.push_str("${");
            rest = &tail[2..];
        }
    }
    out.push_str(rest);
    out
}

/// Substitute and resolve a path value; relative results join onto the
/// project root.
pub fn resolve_path_value(value: &str, ctx: &ProjectContext) -> PathBuf {
    let expanded = substitute(value.trim(), ctx);
    ctx.project_root().join(expanded)
}

/// Absolute path of the requirements manifest named in `DEPENDENCIES`.
pub fn requirements_path(ctx: &ProjectContext, config: &Configuration) -> PathBuf {
    let name = config.get_or(
        sections::DEPENDENCIES,
        keys::REQUIREMENTS_FILE,
        DEFAULT_REQUIREMENTS_FILE,
    );
    let name = PathBuf::from(substitute(name, ctx));
    if name.is_absolute() {
        name
    } else {
        ctx.python_dir().join(name)
    }
}

/// Critical package names from `DEPENDENCIES.critical_packages`
/// (comma or whitespace separated).
pub fn critical_packages(config: &Configuration) -> Vec<String> {
    match config.get(sections::DEPENDENCIES, keys::CRITICAL_PACKAGES) {
        Some(list) => split_list(list),
        None => DEFAULT_CRITICAL_PACKAGES.iter().map(|s| s.to_string()).collect(),
    }
}

/// Interpreter for pip calls: `ENVIRONMENT.python_path` when set, otherwise
/// the context's resolved interpreter.
pub fn interpreter_for(ctx: &ProjectContext, config: &Configuration) -> Result<PathBuf> {
    match config.get(sections::ENVIRONMENT, keys::PYTHON_PATH) {
        Some(p) if !p.trim().is_empty() => Ok(PathBuf::from(substitute(p.trim(), ctx))),
        _ => ctx.interpreter().map(Path::to_path_buf),
    }
}

pub fn split_list(list: &str) -> Vec<String> {
    list.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Path rendered with forward slashes, the form config values use.
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
