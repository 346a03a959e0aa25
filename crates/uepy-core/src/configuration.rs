//! Sectioned key/value configuration, read from INI text with `rust-ini`.
//!
//! Sections and keys keep insertion order. Section names are case-sensitive;
//! keys match case-insensitively and keep the spelling they were first
//! written with, since `PATHS` and `VARIABLES` keys become environment
//! variable names.

use std::fmt;

use ini::{Ini, ParseOption};
use serde::Serialize;
use thiserror::Error;

/// One `[NAME]` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Insert or replace `key`. Returns the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Ordered mapping of section name to key/value entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Configuration {
    sections: Vec<Section>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// The named section, created empty at the end if absent.
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        let idx = match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Value of `section.key`, or `fallback` when either is missing.
    pub fn get_or<'a>(&'a self, section: &str, key: &str, fallback: &'a str) -> &'a str {
        self.get(section, key).unwrap_or(fallback)
    }

    pub fn set(&mut self, section: &str, key: impl Into<String>, value: impl Into<String>) {
        self.section_mut(section).set(key, value);
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Apply `other` on top of `self`: colliding keys take `other`'s value,
    /// everything else in `self` is kept, new sections and keys are appended.
    pub fn overlay(&mut self, other: Configuration) {
        for section in other.sections {
            let target = self.section_mut(&section.name);
            for (key, value) in section.entries {
                target.set(key, value);
            }
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in section.iter() {
                writeln!(f, "{} = {}", key, value)?;
            }
        }
        Ok(())
    }
}

/// Syntax error in INI text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// Parse INI text.
///
/// Values are taken literally: no quote stripping and no backslash escapes,
/// so Windows paths survive. A repeated section header merges into the
/// first; a repeated key keeps the last value. Keys before the first header
/// are rejected.
pub fn parse(content: &str) -> Result<Configuration, ParseError> {
    let opts = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    };
    let ini = Ini::load_from_str_opt(content, opts).map_err(|e| ParseError {
        line: e.line,
        message: e.msg.to_string(),
    })?;

    let mut config = Configuration::new();
    for (name, props) in ini.iter() {
        match name {
            Some(name) => {
                let section = config.section_mut(name.trim());
                for (key, value) in props.iter() {
                    section.set(key.trim(), value.trim());
                }
            }
            None if props.iter().next().is_some() => {
                return Err(ParseError {
                    line: first_content_line(content),
                    message: "key/value line before any section header".to_string(),
                });
            }
            None => {}
        }
    }
    Ok(config)
}

/// 1-based number of the first line that is neither blank nor a comment.
fn first_content_line(content: &str) -> usize {
    content
        .lines()
        .position(|l| {
            let l = l.trim();
            !(l.is_empty() || l.starts_with('#') || l.starts_with(';'))
        })
        .map_or(1, |idx| idx + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections_and_separators() {
        let text = "\
# project overrides
[DEPENDENCIES]
requirements_file = editor-requirements.txt

[VARIABLES]
; comment
MY_FLAG: on
URL = http://example.com/a=b
";
        let cfg = parse(text).unwrap();
        assert_eq!(
            cfg.get("DEPENDENCIES", "requirements_file"),
            Some("editor-requirements.txt")
        );
        assert_eq!(cfg.get("VARIABLES", "my_flag"), Some("on"));
        assert_eq!(cfg.get("VARIABLES", "URL"), Some("http://example.com/a=b"));
        let names: Vec<_> = cfg.sections().map(|s| s.name()).collect();
        assert_eq!(names, vec!["DEPENDENCIES", "VARIABLES"]);
    }

    #[test]
    fn test_parse_keeps_key_case_and_backslashes() {
        let text = "[ENVIRONMENT]\npython_path = C:\\Tools\\Python\\python.exe\n[VARIABLES]\nUe_Mixed = \"quoted\"\n";
        let cfg = parse(text).unwrap();
        assert_eq!(
            cfg.get("ENVIRONMENT", "python_path"),
            Some("C:\\Tools\\Python\\python.exe")
        );
        let keys: Vec<_> = cfg.section("VARIABLES").unwrap().iter().collect();
        assert_eq!(keys, vec![("Ue_Mixed", "\"quoted\"")]);
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        let err = parse("# header comment\n\norphan = 1\n[A]\nx = 1\n").unwrap_err();
        assert_eq!(err.line, 3);

        let err = parse("[OK]\na = 1\n[broken\n").unwrap_err();
        assert!(err.line >= 2, "line {}", err.line);

        let err = parse("[OK]\n\njust words\n").unwrap_err();
        assert!(err.line >= 2, "line {}", err.line);
    }

    #[test]
    fn test_reopened_section_merges() {
        let cfg = parse("[A]\nx = 1\n[B]\ny = 2\n[A]\nx = 3\nz = 4\n").unwrap();
        let a = cfg.section("A").unwrap();
        assert_eq!(a.get("x"), Some("3"));
        assert_eq!(a.get("z"), Some("4"));
        assert_eq!(cfg.sections().count(), 2);
    }

    #[test]
    fn test_overlay_replaces_and_preserves() {
        let mut base = Configuration::new();
        base.set("PATHS", "python_paths", "Content/Python/Scripts");
        base.set("VARIABLES", "PYTHON_DEBUG", "1");
        base.set("VARIABLES", "UE_PROJECT", "/p");

        let mut over = Configuration::new();
        over.set("VARIABLES", "python_debug", "0");
        over.set("EXTRA", "k", "v");

        base.overlay(over);
        assert_eq!(base.get("VARIABLES", "PYTHON_DEBUG"), Some("0"));
        assert_eq!(base.get("VARIABLES", "UE_PROJECT"), Some("/p"));
        assert_eq!(
            base.get("PATHS", "python_paths"),
            Some("Content/Python/Scripts")
        );
        assert_eq!(base.get("EXTRA", "k"), Some("v"));
        // First spelling of a key is kept.
        let keys: Vec<_> = base
            .section("VARIABLES")
            .unwrap()
            .iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["PYTHON_DEBUG", "UE_PROJECT"]);
    }

    #[test]
    fn test_display_reads_back() {
        let mut cfg = Configuration::new();
        cfg.set("A", "one", "1");
        cfg.set("A", "path", "${PROJECT_ROOT}/Content");
        cfg.set("B", "two", "2");
        let reparsed = parse(&cfg.to_string()).unwrap();
        assert_eq!(reparsed, cfg);
    }
}
