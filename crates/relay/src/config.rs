use std::time::Duration;

/// Path of the game server's ingestion endpoint.
pub const INGEST_PATH: &str = "/api/send-to-mc";

/// Default upstream request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the relay client.
#[derive(Clone)]
pub struct RelayConfig {
    /// Upstream host, optionally with an `http://` or `https://` scheme.
    pub host: String,

    /// Upstream port.
    pub port: u16,

    /// Bearer token sent with every relay request.
    pub token: String,

    /// Upper bound on a single relay attempt, connect through response.
    pub timeout: Duration,
}

impl RelayConfig {
    /// Create a configuration for `host:port` with the default timeout.
    pub fn new(host: impl Into<String>, port: u16, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The full ingestion URL.
    ///
    /// A host without a scheme is treated as plain HTTP.
    pub fn url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}:{}{INGEST_PATH}", self.port)
        } else {
            format!("http://{host}:{}{INGEST_PATH}", self.port)
        }
    }
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = RelayConfig::new("localhost", 8080, "secret");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.url(), "http://localhost:8080/api/send-to-mc");
    }

    #[test]
    fn url_keeps_explicit_scheme() {
        let config = RelayConfig::new("https://mc.example.com/", 443, "secret");
        assert_eq!(config.url(), "https://mc.example.com:443/api/send-to-mc");
    }

    #[test]
    fn timeout_builders() {
        let config = RelayConfig::new("h", 1, "t").with_timeout_secs(3);
        assert_eq!(config.timeout, Duration::from_secs(3));
        let config = config.with_timeout(Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn debug_redacts_token() {
        let token = "test-token-placeholder";
        let debug = format!("{:?}", RelayConfig::new("h", 1, token));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(token));
    }
}
