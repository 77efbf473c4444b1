use aether_core::{Feature, FeatureDisabledError, FilterError, ValidationError};
use aether_relay::RelayError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::auth::AuthError;
use crate::config::ConfigError;

/// Body sent for any 5xx that must not reveal its cause.
pub const GENERIC_SERVER_ERROR: &str = "internal server error";

/// Body sent when the upstream relay fails.
pub const RELAY_FAILED: &str = "failed to send message";

/// Errors that can occur when running the Aether bridge.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration could not be resolved.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An I/O error (e.g. creating the log directory).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The tracing subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(String),

    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The bearer credential was missing or wrong.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The requested capability is switched off.
    #[error(transparent)]
    FeatureDisabled(#[from] FeatureDisabledError),

    /// The request payload was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The inbound message tripped the content filter.
    #[error(transparent)]
    Filtered(#[from] FilterError),

    /// Relaying to the game server failed.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// Anything else that should surface as a bare 500.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn bind(addr: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            addr: addr.into(),
            source,
        }
    }

    /// The HTTP status this error maps to at the request boundary.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Auth(AuthError::MissingToken) => StatusCode::UNAUTHORIZED,
            Self::Auth(AuthError::InvalidToken) | Self::Filtered(_) => StatusCode::FORBIDDEN,
            Self::FeatureDisabled(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Relay(e) if e.is_invalid() => StatusCode::BAD_REQUEST,
            Self::Relay(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Logging(_)
            | Self::Bind { .. }
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message placed in the `error` field of the response body.
    ///
    /// Server-side failures get a fixed message; their detail belongs in the
    /// logs, not in the response.
    fn public_message(&self) -> String {
        match self {
            Self::Auth(e) => e.to_string(),
            Self::FeatureDisabled(_) => "feature not enabled".to_owned(),
            Self::Validation(e) => e.to_string(),
            Self::Filtered(e) => e.to_string(),
            Self::Relay(e) if e.is_invalid() => e.to_string(),
            Self::Relay(_) => RELAY_FAILED.to_owned(),
            Self::Config(_)
            | Self::Io(_)
            | Self::Logging(_)
            | Self::Bind { .. }
            | Self::Internal(_) => GENERIC_SERVER_ERROR.to_owned(),
        }
    }

    fn feature(&self) -> Option<Feature> {
        match self {
            Self::FeatureDisabled(FeatureDisabledError(feature)) => Some(*feature),
            _ => None,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.public_message();

        let body = if let Some(feature) = self.feature() {
            serde_json::json!({ "error": message, "feature": feature })
        } else {
            serde_json::json!({ "error": message })
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: ServerError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn auth_errors_map_to_401_and_403() {
        let (status, body) = body_json(AuthError::MissingToken.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "missing bearer token");

        let (status, _) = body_json(AuthError::InvalidToken.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn feature_disabled_names_the_feature() {
        let err: ServerError = FeatureDisabledError(Feature::MessageSender).into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "feature not enabled");
        assert_eq!(body["feature"], "messageSender");
    }

    #[tokio::test]
    async fn validation_and_filter() {
        let (status, body) = body_json(ValidationError::MissingParams.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing required parameters");
        assert!(body.get("feature").is_none());

        let err: ServerError = FilterError::FilteredContent {
            term: "admin".into(),
        }
        .into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(!body["error"].as_str().unwrap().contains("admin"));
    }

    #[tokio::test]
    async fn relay_failures_hide_upstream_detail() {
        let (status, body) = body_json(RelayError::UpstreamStatus(502).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], RELAY_FAILED);

        let invalid: RelayError = ValidationError::EmptyMessage.into();
        let (status, body) = body_json(invalid.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "message must not be empty");
    }

    #[tokio::test]
    async fn internal_errors_are_generic() {
        let (status, body) =
            body_json(ServerError::Internal("db password is hunter2".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], GENERIC_SERVER_ERROR);
    }
}
