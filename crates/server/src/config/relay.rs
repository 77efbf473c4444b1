use serde::Deserialize;

/// Location of the game server's ingestion endpoint.
#[derive(Debug, Deserialize)]
pub struct RelayServerConfig {
    /// Upstream host (`MC_SERVER_HOST`).
    #[serde(default = "default_relay_host")]
    pub host: String,
    /// Upstream port (`MC_SERVER_PORT`).
    #[serde(default = "default_relay_port")]
    pub port: u16,
    /// Upper bound on a single relay call, in seconds.
    #[serde(default = "default_relay_timeout")]
    pub timeout_seconds: u64,
}

impl Default for RelayServerConfig {
    fn default() -> Self {
        Self {
            host: default_relay_host(),
            port: default_relay_port(),
            timeout_seconds: default_relay_timeout(),
        }
    }
}

fn default_relay_host() -> String {
    "localhost".to_owned()
}

fn default_relay_port() -> u16 {
    8080
}

fn default_relay_timeout() -> u64 {
    10
}
