//! Parsing and validation of `vesta.toml` build request files.
//!
//! A build request names the sources to compile, the dependency archives to
//! mount, the dependencies the build declares and how strictly their use is
//! audited. This crate produces a strongly-typed [`BuildConfig`] from it.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
