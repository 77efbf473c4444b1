use aether_core::ValidationError;
use thiserror::Error;

/// Errors raised while relaying a message upstream.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The message was rejected before any request was made.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The upstream endpoint answered with a status other than 200.
    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(u16),

    /// The request never completed (connect, DNS, reset, or timeout).
    #[error("relay transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl RelayError {
    /// Whether the caller supplied an unacceptable message.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// Whether the failure was a timeout on the upstream call.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}
