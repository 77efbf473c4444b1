use aether_core::{RelayRequest, iso8601};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use chrono::Utc;
use tracing::{error, info};

use super::AppState;
use super::messages::malformed;
use super::schemas::{ErrorResponse, SendMessageRequest, SendResponse, SentMessage};
use crate::error::ServerError;

/// `POST /api/send` -- broadcast a message into the game server's chat.
#[utoipa::path(
    post,
    path = "/api/send",
    tag = "Messages",
    summary = "Send to game chat",
    description = "Relays a message, optionally tagged with `[prefix]`, to the game server's ingestion endpoint. One attempt, no retry.",
    request_body(content = SendMessageRequest, description = "Message to relay"),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Message relayed", body = SendResponse),
        (status = 400, description = "Empty or too long", body = ErrorResponse),
        (status = 401, description = "Missing bearer token", body = ErrorResponse),
        (status = 403, description = "Invalid token", body = ErrorResponse),
        (status = 500, description = "Upstream unreachable or rejected the message", body = ErrorResponse),
        (status = 503, description = "messageSender disabled", body = ErrorResponse)
    )
)]
pub async fn send(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SendResponse>, ServerError> {
    let Json(payload) = payload.map_err(|e| malformed(&e))?;
    let request = RelayRequest::new(payload.message.unwrap_or_default(), payload.prefix)?;

    if let Err(e) = state.relay.send(&request).await {
        error!(
            error = %e,
            timeout = e.is_timeout(),
            upstream = state.relay.url(),
            "failed to relay message to game server"
        );
        return Err(e.into());
    }

    let time = iso8601(Utc::now());
    info!(
        text = request.text(),
        prefix = request.prefix(),
        "message relayed to game server"
    );

    Ok(Json(SendResponse {
        status: "success".to_owned(),
        sent: SentMessage {
            message: request.text().to_owned(),
            prefix: request.prefix().map(str::to_owned),
            time,
        },
    }))
}
