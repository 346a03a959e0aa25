use std::path::Path;

use anyhow::Result;
use uepy_env::deps::parse_requirements;

/// `uepy parse <MANIFEST>`: the flattened requirement list, `-r` includes
/// expanded. A missing manifest prints nothing and fails.
pub fn cmd_parse(manifest: &Path, json: bool) -> Result<bool> {
    let requirements = parse_requirements(manifest);
    if json {
        println!("{}", serde_json::to_string(&requirements)?);
    } else {
        for req in &requirements {
            println!("{}", req);
        }
    }
    Ok(manifest.is_file())
}
