//! Locating and loading the build request shared by the subcommands.

use std::path::Path;

use vesta_config::{BuildConfig, ConfigError};

use crate::GlobalArgs;

/// Loads the build request named by `--config`, or `vesta.toml` in the
/// current directory.
///
/// `--config` may name either the file itself or the directory holding it.
pub fn load_request(global: &GlobalArgs) -> Result<BuildConfig, ConfigError> {
    match &global.config {
        Some(path) => load_from(Path::new(path)),
        None => vesta_config::load_config(&std::env::current_dir()?),
    }
}

fn load_from(path: &Path) -> Result<BuildConfig, ConfigError> {
    if path.is_dir() {
        vesta_config::load_config(path)
    } else {
        vesta_config::load_config_file(path)
    }
}
