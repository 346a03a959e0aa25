//! Environment-variable configuration layer.
//!
//! Every `std::env` read and write in uepy goes through this module so the
//! rest of the code works with typed settings.
//!
//! - `loader`: `env_or`, `env_optional`, `env_bool`, `.env` loading, `set_env_var`
//! - `schema`: `ObservabilityConfig`
//! - `env_keys`: variable names and their aliases

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{env_bool, env_optional, env_or, load_dotenv, load_dotenv_from, set_env_var};
pub use schema::ObservabilityConfig;
