use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use uepy_core::ContextOptions;

/// uepy - bootstrap the Python runtime of an editor project
#[derive(Parser, Debug)]
#[command(name = "uepy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Project location overrides, shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Project root (default: $UEPY_PROJECT_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Content directory, relative to the project root (default: Content)
    #[arg(long, global = true, value_name = "DIR")]
    pub content_dir: Option<PathBuf>,

    /// Engine installation, for the bundled interpreter (default: $UEPY_ENGINE_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub engine_dir: Option<PathBuf>,

    /// Log directory, relative to the project root (default: Saved/Logs)
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Python interpreter to use instead of the bundled one
    #[arg(long, global = true, value_name = "PATH")]
    pub python: Option<PathBuf>,

    /// Running inside the editor: report the outcome as JSON and exit 0
    #[arg(long, global = true)]
    pub embedded: bool,
}

impl GlobalArgs {
    pub fn context_options(&self) -> ContextOptions {
        ContextOptions {
            project_dir: self.project_dir.clone(),
            content_dir: self.content_dir.clone(),
            engine_dir: self.engine_dir.clone(),
            log_dir: self.log_dir.clone(),
            python: self.python.clone(),
            embedded: self.embedded,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Full setup: paths, variables, Python path, dependencies
    Setup {
        /// Config file, relative to <content>/Python (default: setup_config.ini)
        #[arg(long, value_name = "FILE", env = "UEPY_CONFIG")]
        config: Option<PathBuf>,

        /// Check the critical packages afterwards
        #[arg(long)]
        validate: bool,
    },

    /// Install a requirements manifest (default: the configured one)
    Install {
        /// Manifest path, relative to <content>/Python
        #[arg(value_name = "MANIFEST")]
        manifest: Option<PathBuf>,

        #[arg(long, value_name = "FILE", env = "UEPY_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Check that critical packages are installed
    Validate {
        /// Comma-separated package names (default: DEPENDENCIES.critical_packages)
        #[arg(long, value_delimiter = ',')]
        packages: Vec<String>,

        #[arg(long, value_name = "FILE", env = "UEPY_CONFIG")]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the requirements a manifest expands to, includes followed
    Parse {
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        /// Print a JSON array instead of one line per requirement
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config {
        #[arg(long, value_name = "FILE", env = "UEPY_CONFIG")]
        config: Option<PathBuf>,

        /// Expand placeholders in every value
        #[arg(long)]
        resolved: bool,

        /// Print JSON instead of INI
        #[arg(long)]
        json: bool,
    },
}
