//! Outbound relay from the Aether bridge to the game server.
//!
//! The relay posts a single JSON document, `{"message": "<rendered text>"}`,
//! to the game server's ingestion endpoint with a bearer token. Only HTTP 200
//! counts as delivered.
//!
//! ```rust,no_run
//! use aether_relay::{RelayClient, RelayConfig};
//!
//! # async fn demo() -> Result<(), aether_relay::RelayError> {
//! let config = RelayConfig::new("localhost", 8080, "shared-secret").with_timeout_secs(5);
//! let client = RelayClient::new(config)?;
//! client.relay("server restarting in 5 minutes", Some("sys")).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::RelayClient;
pub use config::{DEFAULT_TIMEOUT, INGEST_PATH, RelayConfig};
pub use error::RelayError;
