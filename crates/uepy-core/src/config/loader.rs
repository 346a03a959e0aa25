//! Environment variable loading.
//!
//! Keeps the fallback chains in one place instead of repeating `or_else` in
//! callers.

use std::env;
use std::path::Path;

/// Load `.env` from the current directory (existing variables win).
pub fn load_dotenv() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let dir = env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
        load_dotenv_from(&dir);
    });
}

/// Load `<dir>/.env` into the process environment without overriding
/// variables that are already set. Returns the number of variables applied.
pub fn load_dotenv_from(dir: &Path) -> usize {
    let Ok(content) = std::fs::read_to_string(dir.join(".env")) else {
        return 0;
    };
    let mut applied = 0;
    for (key, value) in parse_dotenv(&content) {
        if env::var(key).is_err() {
            set_env_var(key, value);
            applied += 1;
        }
    }
    applied
}

fn parse_dotenv(content: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let mut value = value.trim();
        // Strip inline comment (# not inside quotes)
        if let Some(hash_pos) = value.find('#') {
            let before_hash = value[..hash_pos].trim_end();
            if !before_hash.contains('"') && !before_hash.contains('\'') {
                value = before_hash;
            }
        }
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            value = &value[1..value.len() - 1];
        }
        if !key.is_empty() {
            pairs.push((key, value));
        }
    }
    pairs
}

/// Read the primary variable or the first set alias, falling back to `default`.
pub fn env_or<F>(primary: &str, aliases: &[&str], default: F) -> String
where
    F: FnOnce() -> String,
{
    env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default)
}

/// Read the primary variable or an alias; empty values count as unset.
pub fn env_optional(primary: &str, aliases: &[&str]) -> Option<String> {
    env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()))
        .and_then(|s| {
            let s = s.trim().to_string();
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        })
}

/// Boolean variable: `0`/`false`/`no`/`off` are false, anything else true.
pub fn env_bool(primary: &str, aliases: &[&str], default: bool) -> bool {
    let v = env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()));
    match v.as_deref() {
        Some(s) => !matches!(
            s.trim().to_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        None => default,
    }
}

// All process-environment writes go through here. Callers must run before
// any worker threads are spawned; uepy is single-threaded throughout.

/// Set a process environment variable.
pub fn set_env_var(key: &str, value: &str) {
    env::set_var(key, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotenv_quotes_and_comments() {
        let content = "# header\nA=1\nB = \"two words\"\nC='x' \nD=value # trailing\n\nnoequals\n";
        let pairs = parse_dotenv(content);
        assert_eq!(
            pairs,
            vec![("A", "1"), ("B", "two words"), ("C", "x"), ("D", "value")]
        );
    }

    #[test]
    fn test_env_bool_values() {
        set_env_var("UEPY_TEST_BOOL_OFF", "off");
        set_env_var("UEPY_TEST_BOOL_ON", "yes");
        assert!(!env_bool("UEPY_TEST_BOOL_OFF", &[], true));
        assert!(env_bool("UEPY_TEST_BOOL_ON", &[], false));
        assert!(env_bool("UEPY_TEST_BOOL_UNSET", &[], true));
    }

    #[test]
    fn test_env_optional_alias_and_empty() {
        set_env_var("UEPY_TEST_ALIAS_B", "from-alias");
        set_env_var("UEPY_TEST_EMPTY", "   ");
        assert_eq!(
            env_optional("UEPY_TEST_ALIAS_A", &["UEPY_TEST_ALIAS_B"]).as_deref(),
            Some("from-alias")
        );
        assert_eq!(env_optional("UEPY_TEST_EMPTY", &[]), None);
    }

    #[test]
    fn test_load_dotenv_from_does_not_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".env"),
            "UEPY_TEST_DOTENV_NEW=fresh\nUEPY_TEST_DOTENV_SET=from-file\n",
        )
        .unwrap();
        set_env_var("UEPY_TEST_DOTENV_SET", "already");
        let applied = load_dotenv_from(dir.path());
        assert_eq!(applied, 1);
        assert_eq!(env::var("UEPY_TEST_DOTENV_NEW").unwrap(), "fresh");
        assert_eq!(env::var("UEPY_TEST_DOTENV_SET").unwrap(), "already");
    }
}
