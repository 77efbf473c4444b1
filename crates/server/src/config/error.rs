use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving the startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting was absent or empty.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A setting could not be parsed.
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// The configuration file exists but could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
