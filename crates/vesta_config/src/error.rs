//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `vesta.toml` file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A dependency declaration names an archive the request does not list.
    #[error("dependency '{label}' refers to unlisted archive '{archive}'")]
    UnknownArchive {
        /// The dependency label.
        label: String,
        /// The archive it refers to.
        archive: String,
    },

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("request.sources".to_string());
        assert_eq!(format!("{err}"), "missing required field: request.sources");
    }

    #[test]
    fn display_parse_error() {
        let err = ConfigError::ParseError("expected '=' at line 3".to_string());
        assert_eq!(
            format!("{err}"),
            "failed to parse configuration: expected '=' at line 3"
        );
    }

    #[test]
    fn display_unknown_archive() {
        let err = ConfigError::UnknownArchive {
            label: "lodash".to_string(),
            archive: "deps/lodash.tar".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "dependency 'lodash' refers to unlisted archive 'deps/lodash.tar'"
        );
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::IoError(io_err);
        assert!(format!("{err}").starts_with("failed to read configuration:"));
    }
}
