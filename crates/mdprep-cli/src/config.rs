//! Layered configuration for the command-line interface.
//!
//! Values are resolved with the precedence: command-line flags, then `--set`
//! overrides, then the TOML config file, then built-in defaults.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_config, build_tools_config, load_file_config, resolve_exclusions};
pub use models::AppConfig;
