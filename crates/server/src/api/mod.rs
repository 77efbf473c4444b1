pub mod health;
pub mod messages;
pub mod openapi;
pub mod schemas;
pub mod send;

use std::any::Any;
use std::sync::Arc;

use aether_core::{ContentFilter, Feature, FeatureFlags};
use aether_relay::RelayClient;
use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use self::openapi::ApiDoc;
use crate::auth::{AuthLayer, SharedSecret};
use crate::config::BridgeConfig;
use crate::error::{GENERIC_SERVER_ERROR, ServerError};
use crate::feature_gate::FeatureGateLayer;

/// Shared application state passed to all handlers.
///
/// Everything here is resolved once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    /// Resolved capability switches.
    pub features: FeatureFlags,
    /// The API key protected routes are checked against.
    pub secret: Arc<SharedSecret>,
    /// Client for the game server's ingestion endpoint.
    pub relay: Arc<RelayClient>,
    /// Blocklist applied to inbound chat.
    pub filter: Arc<ContentFilter>,
}

impl AppState {
    /// Build the request-time state from a validated configuration.
    pub fn from_config(config: &BridgeConfig) -> Result<Self, ServerError> {
        let relay = RelayClient::new(config.relay_config())?;
        Ok(Self {
            features: config.features,
            secret: Arc::new(SharedSecret::new(config.auth.api_key.clone())),
            relay: Arc::new(relay),
            filter: Arc::new(config.content_filter()),
        })
    }
}

/// Build the Axum router with all API routes and middleware.
///
/// Protected routes run auth first, then the per-route feature gate, then
/// body extraction inside the handler.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/api-doc/openapi.json", get(openapi_json));

    let protected = Router::new()
        .route(
            "/api/mc-message",
            post(messages::receive).route_layer(FeatureGateLayer::new(
                state.features,
                Feature::MessageReceiver,
            )),
        )
        .route(
            "/api/send",
            post(send::send).route_layer(FeatureGateLayer::new(
                state.features,
                Feature::MessageSender,
            )),
        )
        .layer(AuthLayer::new(state.secret.clone()));

    let app = Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state);

    with_fault_boundary(app)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Turn handler panics into a generic JSON 500.
fn with_fault_boundary(router: Router) -> Router {
    router.layer(CatchPanicLayer::custom(handle_panic))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = detail, "request handler panicked");

    let body = serde_json::json!({ "error": GENERIC_SERVER_ERROR });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
