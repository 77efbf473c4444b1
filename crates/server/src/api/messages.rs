use aether_core::{FilterError, Message, ValidationError};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::{info, warn};

use super::AppState;
use super::schemas::{ErrorResponse, InboundMessageRequest, ReceiptResponse};
use crate::error::ServerError;

/// Turn an extractor rejection into a 400 instead of axum's plain-text body.
pub(crate) fn malformed(rejection: &JsonRejection) -> ServerError {
    ValidationError::MalformedBody(rejection.body_text()).into()
}

/// `POST /api/mc-message` -- accept a chat line from the game server.
#[utoipa::path(
    post,
    path = "/api/mc-message",
    tag = "Messages",
    summary = "Receive game chat",
    description = "Validates and filters a chat line posted by the game server and acknowledges it.",
    request_body(content = InboundMessageRequest, description = "Chat line"),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Message accepted", body = ReceiptResponse),
        (status = 400, description = "Missing player or message", body = ErrorResponse),
        (status = 401, description = "Missing bearer token", body = ErrorResponse),
        (status = 403, description = "Invalid token or blocked content", body = ErrorResponse),
        (status = 503, description = "messageReceiver disabled", body = ErrorResponse)
    )
)]
pub async fn receive(
    State(state): State<AppState>,
    payload: Result<Json<InboundMessageRequest>, JsonRejection>,
) -> Result<Json<ReceiptResponse>, ServerError> {
    let Json(payload) = payload.map_err(|e| malformed(&e))?;
    let message = Message::inbound(payload.player, payload.message)?;

    info!(
        player = %message.player,
        text = %message.text,
        "received message from game server"
    );

    if let Err(e) = state.filter.check(&message.text) {
        let FilterError::FilteredContent { term } = &e;
        warn!(
            player = %message.player,
            text = %message.text,
            term = %term,
            "message rejected by content filter"
        );
        return Err(e.into());
    }

    Ok(Json(ReceiptResponse {
        status: "success".to_owned(),
        received: message.ack(),
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fmt;
    use std::sync::{Arc, Mutex};

    use aether_core::FeatureFlags;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    use crate::api::{self, AppState};
    use crate::config::BridgeConfig;

    /// A recorded event: its level and every field rendered as text.
    type Recorded = (Level, HashMap<String, String>);

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<Recorded>>>);

    struct Fields(HashMap<String, String>);

    impl Visit for Fields {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_owned(), value.to_owned());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_owned(), format!("{value:?}"));
        }
    }

    impl<S: Subscriber> Layer<S> for Capture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = Fields(HashMap::new());
            event.record(&mut fields);
            self.0
                .lock()
                .unwrap()
                .push((*event.metadata().level(), fields.0));
        }
    }

    fn app() -> axum::Router {
        let mut config = BridgeConfig::default();
        config.auth.api_key = "secret".to_owned();
        config.features = FeatureFlags {
            message_sender: false,
            message_receiver: true,
        };
        api::router(AppState::from_config(&config).unwrap())
    }

    #[tokio::test]
    async fn filtered_message_logs_warning_with_term() {
        let capture = Capture::default();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(capture.clone()));

        let request = Request::post("/api/mc-message")
            .header(header::AUTHORIZATION, "Bearer secret")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"player":"Mallory","message":"ADMIN override"}"#,
            ))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let events = capture.0.lock().unwrap();
        let (level, fields) = events
            .iter()
            .find(|(_, f)| {
                f.get("message").map(String::as_str) == Some("message rejected by content filter")
            })
            .expect("filter rejection event");
        assert_eq!(*level, Level::WARN);
        assert_eq!(fields["term"], "admin");
        assert_eq!(fields["player"], "Mallory");
        assert_eq!(fields["text"], "ADMIN override");
    }
}
