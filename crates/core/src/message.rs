use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum length, in characters, of an outbound message before the prefix
/// is applied.
pub const MAX_MESSAGE_CHARS: usize = 256;

/// Format a timestamp as ISO-8601 with millisecond precision and a `Z` suffix.
pub fn iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A chat message received from the game server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub player: String,
    pub text: String,
    pub prefix: Option<String>,
    /// Assigned when validation completes, not when the request arrived.
    pub received_at: DateTime<Utc>,
}

impl Message {
    /// Validate an inbound chat message.
    ///
    /// Both `player` and `text` must be present and non-empty.
    pub fn inbound(player: Option<String>, text: Option<String>) -> Result<Self, ValidationError> {
        let player = player.filter(|p| !p.is_empty());
        let text = text.filter(|t| !t.is_empty());
        let (Some(player), Some(text)) = (player, text) else {
            return Err(ValidationError::MissingParams);
        };

        Ok(Self {
            player,
            text,
            prefix: None,
            received_at: Utc::now(),
        })
    }

    /// The acknowledgment returned to the game server.
    pub fn ack(&self) -> ReceiptAck {
        ReceiptAck {
            player: self.player.clone(),
            message: self.text.clone(),
            time: iso8601(self.received_at),
        }
    }
}

/// Echo of an accepted inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReceiptAck {
    #[cfg_attr(feature = "openapi", schema(example = "Alice"))]
    pub player: String,
    #[cfg_attr(feature = "openapi", schema(example = "hello from the server"))]
    pub message: String,
    /// Server-assigned receipt time (ISO-8601).
    #[cfg_attr(feature = "openapi", schema(example = "2024-05-01T12:00:00.000Z"))]
    pub time: String,
}

/// A validated message bound for the game server's ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    text: String,
    prefix: Option<String>,
}

impl RelayRequest {
    /// Validate outbound text and an optional prefix.
    ///
    /// The length limit applies to `text` alone; the rendered prefix does not
    /// count towards it. An empty prefix is treated as no prefix.
    pub fn new(text: impl Into<String>, prefix: Option<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }

        let length = text.chars().count();
        if length > MAX_MESSAGE_CHARS {
            return Err(ValidationError::TooLong {
                length,
                max: MAX_MESSAGE_CHARS,
            });
        }

        Ok(Self {
            text,
            prefix: prefix.filter(|p| !p.is_empty()),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The text as it is delivered upstream: `"[prefix] text"` or `text`.
    pub fn rendered(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("[{prefix}] {}", self.text),
            None => self.text.clone(),
        }
    }
}
