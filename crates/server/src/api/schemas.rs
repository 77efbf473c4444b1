use aether_core::{Feature, ReceiptAck};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /api/mc-message`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct InboundMessageRequest {
    /// Name of the player who sent the chat line.
    #[schema(example = "Alice")]
    pub player: Option<String>,
    /// The chat line.
    #[schema(example = "hello from the server")]
    pub message: Option<String>,
}

/// Response to an accepted inbound message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReceiptResponse {
    #[schema(example = "success")]
    pub status: String,
    pub received: ReceiptAck,
}

/// Body of `POST /api/send`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    /// Text to broadcast, at most 256 characters.
    #[schema(example = "server restarting in 5 minutes")]
    pub message: Option<String>,
    /// Optional tag rendered as `[prefix] ` before the text.
    #[schema(example = "sys")]
    pub prefix: Option<String>,
}

/// Echo of a message delivered to the game server.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SentMessage {
    /// The caller's text, without the prefix applied.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Time the upstream accepted the message (ISO-8601).
    #[schema(example = "2024-05-01T12:00:00.000Z")]
    pub time: String,
}

/// Response to a successful relay.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendResponse {
    #[schema(example = "success")]
    pub status: String,
    pub sent: SentMessage,
}

/// Error body shared by every endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "missing bearer token")]
    pub error: String,
    /// Present only on 503 responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<Feature>,
}
