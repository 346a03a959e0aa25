//! Python interpreter resolution.
//!
//! Order: explicit override, the engine's bundled interpreter, then
//! `python3`/`python` on `PATH`. The bundled layout is picked at build time
//! for the target OS.

use std::path::{Path, PathBuf};

use crate::error::{BootstrapError, Result};

/// Path of the bundled interpreter relative to the engine directory, or
/// `None` when the engine ships no interpreter for this target.
pub fn bundled_interpreter_relpath() -> Option<&'static [&'static str]> {
    if cfg!(target_os = "windows") {
        Some(&["Binaries", "ThirdParty", "Python3", "Win64", "python.exe"])
    } else if cfg!(target_os = "linux") {
        Some(&["Binaries", "ThirdParty", "Python3", "Linux", "bin", "python3"])
    } else if cfg!(target_os = "macos") {
        Some(&["Binaries", "ThirdParty", "Python3", "Mac", "bin", "python3"])
    } else {
        None
    }
}

/// The engine's bundled interpreter under `engine_dir`.
pub fn bundled_interpreter(engine_dir: &Path) -> Result<PathBuf> {
    let parts = bundled_interpreter_relpath()
        .ok_or_else(|| BootstrapError::UnsupportedPlatform(std::env::consts::OS.to_string()))?;
    Ok(parts.iter().fold(engine_dir.to_path_buf(), |p, s| p.join(s)))
}

/// Resolve the interpreter used for `pip` calls.
///
/// An override is returned as-is without checking that it exists; a missing
/// override surfaces later as a spawn failure with the path in the message.
pub fn resolve_interpreter(
    python_override: Option<&Path>,
    engine_dir: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(python) = python_override {
        return Ok(python.to_path_buf());
    }

    if let Some(engine_dir) = engine_dir {
        let bundled = bundled_interpreter(engine_dir)?;
        if bundled.is_file() {
            return Ok(bundled);
        }
        tracing::debug!(
            "Bundled interpreter not found at {}, falling back to PATH",
            bundled.display()
        );
    }

    if let Some(python) = which_python() {
        return Ok(python);
    }

    if bundled_interpreter_relpath().is_none() {
        return Err(BootstrapError::UnsupportedPlatform(
            std::env::consts::OS.to_string(),
        ));
    }
    Err(BootstrapError::InterpreterNotFound)
}

fn which_python() -> Option<PathBuf> {
    ["python3", "python"]
        .iter()
        .find_map(|name| which::which(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let python = resolve_interpreter(Some(Path::new("/custom/python")), Some(dir.path()))
            .unwrap();
        assert_eq!(python, PathBuf::from("/custom/python"));
    }

    #[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
    #[test]
    fn test_bundled_interpreter_used_when_present() {
        let engine = tempfile::tempdir().unwrap();
        let bundled = bundled_interpreter(engine.path()).unwrap();
        std::fs::create_dir_all(bundled.parent().unwrap()).unwrap();
        std::fs::write(&bundled, b"").unwrap();

        let python = resolve_interpreter(None, Some(engine.path())).unwrap();
        assert_eq!(python, bundled);
        assert!(python.starts_with(engine.path()));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_bundled_layout_linux() {
        let path = bundled_interpreter(Path::new("/engine")).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/engine/Binaries/ThirdParty/Python3/Linux/bin/python3")
        );
    }
}
