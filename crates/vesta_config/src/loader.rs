//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::BuildConfig;
use std::collections::HashSet;
use std::path::Path;
use vesta_common::vpath;

/// Name of the build request file looked up in a directory.
pub const CONFIG_FILE_NAME: &str = "vesta.toml";

/// Loads and validates `<dir>/vesta.toml`.
///
/// Relative paths in the request are resolved against `dir`.
pub fn load_config(dir: &Path) -> Result<BuildConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a build request file at an explicit path.
///
/// Relative paths in the request are resolved against the file's directory.
pub fn load_config_file(path: &Path) -> Result<BuildConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config = load_config_from_str(&content)?;
    if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        config.rebase(base);
    }
    Ok(config)
}

/// Parses and validates a build request from a string.
///
/// Paths are left exactly as written.
pub fn load_config_from_str(content: &str) -> Result<BuildConfig, ConfigError> {
    let config: BuildConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that the request is complete and internally consistent.
fn validate_config(config: &BuildConfig) -> Result<(), ConfigError> {
    if config.request.sources.is_empty() {
        return Err(ConfigError::MissingField("request.sources".to_string()));
    }

    let root = &config.request.dependency_root;
    if let Err(err) = vpath::validate(root) {
        return Err(ConfigError::ValidationError(format!(
            "request.dependency_root: {err}"
        )));
    }
    if root == vpath::ROOT {
        return Err(ConfigError::ValidationError(
            "request.dependency_root must not be '/'".to_string(),
        ));
    }

    let mut archives = HashSet::new();
    for archive in &config.archives {
        if archive.name.is_empty() {
            return Err(ConfigError::MissingField("archives.name".to_string()));
        }
        archives.insert(archive.name.as_str());
    }

    for decl in &config.dependencies {
        if decl.label.is_empty() {
            return Err(ConfigError::MissingField("dependencies.label".to_string()));
        }
        if !archives.contains(decl.archive.as_str()) {
            return Err(ConfigError::UnknownArchive {
                label: decl.label.clone(),
                archive: decl.archive.clone(),
            });
        }
    }

    if config.cache.archive_capacity == 0 || config.cache.source_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "cache capacities must be at least 1".to_string(),
        ));
    }

    if let Some(ext) = config
        .compiler
        .source_extensions
        .iter()
        .find(|ext| !ext.starts_with('.'))
    {
        return Err(ConfigError::ValidationError(format!(
            "source extension '{ext}' must start with '.'"
        )));
    }

    Ok(())
}
