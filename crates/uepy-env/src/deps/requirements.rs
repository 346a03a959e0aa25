//! Requirements manifest parsing.
//!
//! Line format: blank lines and `#` comments are skipped, `-r <file>` includes
//! another manifest relative to the including file, anything else is a
//! package specifier passed to pip verbatim. Includes expand in place; order
//! is kept and duplicates are not removed.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const INCLUDE_PREFIX: &str = "-r ";

/// Parse `path` and everything it includes.
///
/// Never fails: a missing manifest (top-level or included) is logged and
/// contributes nothing, a read error keeps the entries parsed before it, and
/// an include cycle is cut at the repeated file.
pub fn parse_requirements(path: &Path) -> Vec<String> {
    let mut stack = Vec::new();
    let mut out = Vec::new();
    parse_into(path, &mut stack, &mut out);
    out
}

fn parse_into(path: &Path, stack: &mut Vec<PathBuf>, out: &mut Vec<String>) {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::error!("Requirements file not found: {}", path.display());
            return;
        }
        Err(e) => {
            tracing::error!("Error reading requirements file {}: {}", path.display(), e);
            return;
        }
    };

    let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if stack.contains(&key) {
        tracing::warn!("Skipping recursive include of {}", path.display());
        return;
    }
    stack.push(key);

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let start = out.len();
    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("Error parsing requirements file {}: {}", path.display(), e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(include) = line.strip_prefix(INCLUDE_PREFIX) {
            let include = include.trim();
            if include.is_empty() {
                tracing::warn!("Empty -r include in {}", path.display());
                continue;
            }
            parse_into(&base_dir.join(include), stack, out);
        } else {
            tracing::debug!("Parsed {} from {}", line, path.display());
            out.push(line.to_string());
        }
    }

    stack.pop();
    tracing::info!(
        "Parsed {} dependencies from {}",
        out.len() - start,
        path.display()
    );
}

/// Package name of a specifier: everything before the first version
/// operator, extras bracket, marker, URL `@` or whitespace.
///
/// `requests[security]>=2.0; python_version>'3'` → `requests`.
pub fn package_name(spec: &str) -> &str {
    let end = spec
        .find(|c: char| matches!(c, '<' | '>' | '!' | '=' | '~' | '[' | ';' | '@') || c.is_whitespace())
        .unwrap_or(spec.len());
    spec[..end].trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_include_expands_in_place() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("requirements.txt"),
            "numpy>=1.20\n# comment\n\n-r extra.txt\n",
        )
        .unwrap();
        fs::write(dir.path().join("extra.txt"), "requests\n").unwrap();

        let reqs = parse_requirements(&dir.path().join("requirements.txt"));
        assert_eq!(reqs, vec!["numpy>=1.20", "requests"]);
    }

    #[test]
    fn test_include_order_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(
            dir.path().join("main.txt"),
            "-r sub/base.txt\n  pillow  \nrequests\n",
        )
        .unwrap();
        fs::write(dir.path().join("sub/base.txt"), "requests==2.31.0\n-r more.txt\n").unwrap();
        fs::write(dir.path().join("sub/more.txt"), "pyyaml\n").unwrap();

        let reqs = parse_requirements(&dir.path().join("main.txt"));
        assert_eq!(reqs, vec!["requests==2.31.0", "pyyaml", "pillow", "requests"]);
    }

    #[test]
    fn test_missing_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(parse_requirements(&dir.path().join("nope.txt")).is_empty());

        fs::write(dir.path().join("main.txt"), "a\n-r gone.txt\nb\n").unwrap();
        assert_eq!(parse_requirements(&dir.path().join("main.txt")), vec!["a", "b"]);
    }

    #[test]
    fn test_include_cycle_terminates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "one\n-r b.txt\n").unwrap();
        fs::write(dir.path().join("b.txt"), "two\n-r a.txt\n").unwrap();
        assert_eq!(parse_requirements(&dir.path().join("a.txt")), vec!["one", "two"]);
    }

    #[test]
    fn test_other_options_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("r.txt"),
            "--index-url https://mirror.example/simple\n-e ./localpkg\n",
        )
        .unwrap();
        assert_eq!(
            parse_requirements(&dir.path().join("r.txt")),
            vec!["--index-url https://mirror.example/simple", "-e ./localpkg"]
        );
    }

    #[test]
    fn test_package_name() {
        assert_eq!(package_name("numpy"), "numpy");
        assert_eq!(package_name("numpy>=1.20"), "numpy");
        assert_eq!(package_name("flask ~= 2.0"), "flask");
        assert_eq!(package_name("pkg!=1.0"), "pkg");
        assert_eq!(
            package_name("requests[security]>=2; python_version>'3'"),
            "requests"
        );
        assert_eq!(package_name("mylib @ https://example.com/mylib.whl"), "mylib");
    }
}
