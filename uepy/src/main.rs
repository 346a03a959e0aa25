//! uepy binary. The exit status depends on how it was launched:
//!
//! - standalone: 0 on success, 1 on failure;
//! - embedded (`--embedded` / `UEPY_EMBEDDED=1`): always 0, with the outcome
//!   printed as a final `{"success": bool}` line for the editor to read.

use std::process::ExitCode;

use clap::Parser;
use uepy::cli::{Cli, Commands};
use uepy::commands;
use uepy_core::config::load_dotenv;
use uepy_core::observability::init_logging;
use uepy_core::{HostMode, ProjectContext, Result as CoreResult};

fn main() -> ExitCode {
    load_dotenv();
    let cli = Cli::parse();

    let ctx = cli.global.context_options().resolve();
    let log_file = ctx.as_ref().ok().map(ProjectContext::log_file);
    if let Err(e) = init_logging(log_file.as_deref()) {
        eprintln!("uepy: cannot open log file: {}", e);
        let _ = init_logging(None);
    }

    let host = match &ctx {
        Ok(ctx) => ctx.host(),
        Err(_) if cli.global.embedded => HostMode::Embedded,
        Err(_) => HostMode::Standalone,
    };

    let ok = match run(cli.command, ctx) {
        Ok(ok) => ok,
        Err(e) => {
            tracing::error!("{:#}", e);
            tracing::debug!("{:?}", e);
            false
        }
    };
    finish(host, ok)
}

fn run(command: Commands, ctx: CoreResult<ProjectContext>) -> anyhow::Result<bool> {
    match command {
        Commands::Parse { manifest, json } => commands::parse::cmd_parse(&manifest, json),
        other => run_in_project(other, &ctx?),
    }
}

fn run_in_project(command: Commands, ctx: &ProjectContext) -> anyhow::Result<bool> {
    match command {
        Commands::Setup { config, validate } => Ok(commands::setup::cmd_setup(ctx, config, validate)),
        Commands::Install { manifest, config } => commands::install::cmd_install(ctx, config, manifest),
        Commands::Validate {
            packages,
            config,
            json,
        } => commands::validate::cmd_validate(ctx, config, packages, json),
        Commands::Config {
            config,
            resolved,
            json,
        } => commands::config::cmd_config(ctx, config, resolved, json),
        Commands::Parse { .. } => unreachable!("parse runs without a project"),
    }
}

fn finish(host: HostMode, ok: bool) -> ExitCode {
    match host {
        HostMode::Embedded => {
            println!("{}", serde_json::json!({ "success": ok }));
            ExitCode::SUCCESS
        }
        HostMode::Standalone if ok => ExitCode::SUCCESS,
        HostMode::Standalone => ExitCode::FAILURE,
    }
}
