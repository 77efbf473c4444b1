#![allow(clippy::needless_for_each)]

use aether_core::{Feature, FeatureFlags, HealthSnapshot, ReceiptAck};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

use super::schemas::{
    ErrorResponse, InboundMessageRequest, ReceiptResponse, SendMessageRequest, SendResponse,
    SentMessage,
};

#[derive(utoipa::OpenApi)]
#[openapi(
    info(
        title = "Aether Bridge API",
        version = "0.1.0",
        description = "Authenticated HTTP relay between a game server's chat and external messaging.",
        license(name = "Apache-2.0")
    ),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Messages", description = "Chat in both directions")
    ),
    paths(
        super::health::health,
        super::messages::receive,
        super::send::send,
    ),
    components(schemas(
        HealthSnapshot,
        FeatureFlags,
        Feature,
        ReceiptAck,
        InboundMessageRequest,
        ReceiptResponse,
        SendMessageRequest,
        SendResponse,
        SentMessage,
        ErrorResponse,
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}
