use serde::Deserialize;

/// Shared-secret authentication settings.
#[derive(Default, Deserialize)]
pub struct AuthConfig {
    /// The bearer token every protected request must present. Also sent
    /// upstream on relay calls.
    #[serde(default)]
    pub api_key: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = if self.api_key.is_empty() {
            "<unset>"
        } else {
            "[REDACTED]"
        };
        f.debug_struct("AuthConfig").field("api_key", &shown).finish()
    }
}
