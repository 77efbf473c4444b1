use std::task::{Context, Poll};

use aether_core::{Feature, FeatureFlags};
use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use tower::{Layer, Service};
use tracing::debug;

use crate::error::ServerError;

/// Route layer answering 503 when its capability is switched off.
///
/// Applied per route, inside the auth layer, so unauthenticated callers
/// cannot probe which features are enabled.
#[derive(Debug, Clone, Copy)]
pub struct FeatureGateLayer {
    flags: FeatureFlags,
    feature: Feature,
}

impl FeatureGateLayer {
    pub fn new(flags: FeatureFlags, feature: Feature) -> Self {
        Self { flags, feature }
    }
}

impl<S> Layer<S> for FeatureGateLayer {
    type Service = FeatureGate<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FeatureGate {
            inner,
            flags: self.flags,
            feature: self.feature,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeatureGate<S> {
    inner: S,
    flags: FeatureFlags,
    feature: Feature,
}

impl<S> Service<Request<Body>> for FeatureGate<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        if let Err(e) = self.flags.require(self.feature) {
            debug!(feature = %self.feature, path = req.uri().path(), "feature disabled");
            let response = ServerError::from(e).into_response();
            return Box::pin(async move { Ok(response) });
        }

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(req).await })
    }
}
