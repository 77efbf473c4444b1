mod auth;
mod error;
mod filter;
mod logging;
mod relay;
mod server;


pub use auth::*;
pub use error::*;
pub use filter::*;
pub use logging::*;
pub use relay::*;
pub use server::*;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use aether_core::{ContentFilter, Feature, FeatureFlags};
use aether_relay::RelayConfig;
use serde::Deserialize;

/// Top-level configuration for the bridge, resolved once at startup.
///
/// Values come from built-in defaults, then an optional TOML file, then the
/// process environment. The result is immutable and shared by reference with
/// every component.
#[derive(Debug, Default, Deserialize)]
pub struct BridgeConfig {
    /// HTTP listener configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Shared-secret authentication.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Capability switches.
    #[serde(default)]
    pub features: FeatureFlags,
    /// Upstream game server endpoint.
    #[serde(default)]
    pub relay: RelayServerConfig,
    /// Inbound content filter.
    #[serde(default)]
    pub filter: FilterConfig,
    /// Log sinks and rotation.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BridgeConfig {
    /// Load configuration from `path` (if it exists) and the process
    /// environment, then validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml_str(&contents)?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document; missing sections take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Override settings from environment-style variables.
    ///
    /// `lookup` returns the value for a key, or `None` when it is unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_value("PORT", &port)?;
        }
        if let Some(grace) = lookup("SHUTDOWN_GRACE_SECS") {
            self.server.shutdown_grace_seconds = parse_value("SHUTDOWN_GRACE_SECS", &grace)?;
        }

        if let Some(key) = lookup("API_KEY") {
            self.auth.api_key = key;
        }

        if let Some(host) = lookup("MC_SERVER_HOST") {
            self.relay.host = host;
        }
        if let Some(port) = lookup("MC_SERVER_PORT") {
            self.relay.port = parse_value("MC_SERVER_PORT", &port)?;
        }
        if let Some(timeout) = lookup("RELAY_TIMEOUT_SECS") {
            self.relay.timeout_seconds = parse_value("RELAY_TIMEOUT_SECS", &timeout)?;
        }

        // Only the literal "true" enables a feature.
        for (feature, key) in [
            (Feature::MessageSender, "ENABLE_MESSAGE_SENDER"),
            (Feature::MessageReceiver, "ENABLE_MESSAGE_RECEIVER"),
        ] {
            if let Some(value) = lookup(key) {
                self.features.set(feature, value == "true");
            }
        }

        if let Some(list) = lookup("FILTER_BLOCKLIST") {
            self.filter.blocklist = list
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
                .collect();
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(dir) = lookup("LOG_DIR") {
            self.logging.dir = dir.into();
        }
        if let Some(size) = lookup("MAX_LOG_SIZE") {
            self.logging.max_size = size;
        }
        if let Some(files) = lookup("MAX_LOG_FILES") {
            // Unparseable counts fall back to the default rather than failing startup.
            self.logging.max_files = files
                .trim()
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .unwrap_or(5);
        }

        Ok(())
    }

    /// Check invariants that defaults alone cannot guarantee.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("API_KEY"));
        }
        if self.relay.host.trim().is_empty() {
            return Err(ConfigError::Missing("MC_SERVER_HOST"));
        }
        if self.relay.timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                key: "RELAY_TIMEOUT_SECS",
                value: "0".to_owned(),
                reason: "must be at least 1 second".to_owned(),
            });
        }
        Ok(())
    }

    /// Relay client settings derived from this configuration.
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig::new(
            self.relay.host.clone(),
            self.relay.port,
            self.auth.api_key.clone(),
        )
        .with_timeout_secs(self.relay.timeout_seconds)
    }

    /// The inbound content filter described by this configuration.
    pub fn content_filter(&self) -> ContentFilter {
        ContentFilter::new(&self.filter.blocklist)
    }

    /// Shutdown grace period.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_grace_seconds)
    }
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.to_owned(),
        reason: e.to_string(),
    })
}
