//! # jtk Core Library
//!
//! Shared building blocks for the jtk crates: configuration directories and
//! the credentials file, URL normalization, terminal output helpers and text
//! shaping for table cells.

pub mod config;
pub mod consts;
pub mod output;
pub mod prompts;
pub mod text;
pub mod url;

pub use config::{ConfigDirs, ConfigError, JiraConfig, JiraCredentials, get_config_dirs};
pub use output::{ColorMode, OutputFormat, print_error, print_info, print_success, print_warning};
