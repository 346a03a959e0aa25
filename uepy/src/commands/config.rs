use std::path::PathBuf;

use anyhow::Result;
use uepy_core::setup_config::{load_config, resolve_config_path, substitute};
use uepy_core::{Configuration, ProjectContext};

/// `uepy config`: defaults overlaid with the config file, as INI or JSON.
pub fn cmd_config(
    ctx: &ProjectContext,
    config_file: Option<PathBuf>,
    resolved: bool,
    json: bool,
) -> Result<bool> {
    let path = resolve_config_path(ctx, config_file.as_deref());
    let mut config = load_config(ctx, Some(&path));
    if resolved {
        config = resolve_all(&config, ctx);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        eprintln!("# {}", path.display());
        print!("{}", config);
    }
    Ok(true)
}

/// Copy of `config` with placeholders expanded in every value.
pub fn resolve_all(config: &Configuration, ctx: &ProjectContext) -> Configuration {
    let mut out = Configuration::new();
    for section in config.sections() {
        for (key, value) in section.iter() {
            out.set(section.name(), key, substitute(value, ctx));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use uepy_core::setup_config::default_config;

    #[test]
    fn test_resolve_all_expands_tokens() {
        let ctx = ProjectContext::new("/work/MyGame").with_interpreter("/usr/bin/python3");
        let resolved = resolve_all(&default_config(&ctx), &ctx);
        assert_eq!(
            resolved.get("PATHS", "PIP_TARGET_DIR"),
            Some("/work/MyGame/Content/Python/Lib/site-packages")
        );
        assert_eq!(resolved.get("VARIABLES", "UE_PROJECT"), Some("/work/MyGame"));
        assert_eq!(resolved.get("VARIABLES", "PYTHON_DEBUG"), Some("1"));
    }
}
