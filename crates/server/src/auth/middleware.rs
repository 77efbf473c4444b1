use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use tower::{Layer, Service};
use tracing::warn;

use super::{SharedSecret, authenticate};
use crate::error::ServerError;

/// Tower layer that rejects requests lacking the shared secret.
#[derive(Clone)]
pub struct AuthLayer {
    secret: Arc<SharedSecret>,
}

impl AuthLayer {
    pub fn new(secret: Arc<SharedSecret>) -> Self {
        Self { secret }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            secret: self.secret.clone(),
        }
    }
}

/// Tower service that authenticates requests before anything else runs.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    secret: Arc<SharedSecret>,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
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
        if let Err(e) = authenticate(req.headers(), &self.secret) {
            warn!(
                method = %req.method(),
                path = req.uri().path(),
                reason = %e,
                "rejected unauthenticated request"
            );
            let response = ServerError::from(e).into_response();
            return Box::pin(async move { Ok(response) });
        }

        // Take the instance that was polled ready, leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(req).await })
    }
}
