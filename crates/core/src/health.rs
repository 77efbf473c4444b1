use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::feature::FeatureFlags;
use crate::message::iso8601;

/// Read-only projection served by `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthSnapshot {
    /// Service status indicator.
    #[cfg_attr(feature = "openapi", schema(example = "ok"))]
    pub status: String,
    /// Time the snapshot was taken (ISO-8601).
    pub timestamp: String,
    /// Resolved feature flags.
    pub features: FeatureFlags,
}

impl HealthSnapshot {
    pub fn now(features: FeatureFlags) -> Self {
        Self {
            status: "ok".to_owned(),
            timestamp: iso8601(Utc::now()),
            features,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_shape() {
        let snap = HealthSnapshot::now(FeatureFlags {
            message_sender: true,
            message_receiver: false,
        });
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json["timestamp"].is_string());
        assert_eq!(json["features"]["messageSender"], true);
        assert_eq!(json["features"]["messageReceiver"], false);
    }
}
