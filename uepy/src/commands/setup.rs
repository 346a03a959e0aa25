use std::path::PathBuf;

use uepy_core::ProjectContext;

use crate::bootstrap::{run_setup, SetupOptions};

/// `uepy setup`
pub fn cmd_setup(ctx: &ProjectContext, config: Option<PathBuf>, validate: bool) -> bool {
    run_setup(
        ctx,
        &SetupOptions {
            config_file: config,
            validate,
        },
    )
}
