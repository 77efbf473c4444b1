use aether_core::DEFAULT_BLOCKLIST;
use serde::Deserialize;

/// Inbound chat moderation settings.
#[derive(Debug, Deserialize)]
pub struct FilterConfig {
    /// Case-insensitive substrings that cause an inbound message to be
    /// rejected, in addition to the always-blocked defaults.
    #[serde(default = "default_blocklist")]
    pub blocklist: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            blocklist: default_blocklist(),
        }
    }
}

fn default_blocklist() -> Vec<String> {
    DEFAULT_BLOCKLIST.iter().map(|t| (*t).to_owned()).collect()
}
