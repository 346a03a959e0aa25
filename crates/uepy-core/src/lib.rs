//! uepy core: project context, interpreter resolution, layered setup
//! configuration and logging.

pub mod config;
pub mod configuration;
pub mod context;
pub mod error;
pub mod observability;
pub mod runtime;
pub mod setup_config;

pub use configuration::Configuration;
pub use context::{ContextOptions, HostMode, ProjectContext};
pub use error::{BootstrapError, Result};
