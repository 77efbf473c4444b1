use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FeatureDisabledError;

/// A boot-time switchable capability of the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    /// Relaying operator messages to the game server (`POST /api/send`).
    MessageSender,
    /// Accepting chat messages from the game server (`POST /api/mc-message`).
    MessageReceiver,
}

impl Feature {
    /// All known features, in declaration order.
    pub const ALL: [Self; 2] = [Self::MessageSender, Self::MessageReceiver];

    /// The stable identifier used in responses and logs.
    pub fn id(self) -> &'static str {
        match self {
            Self::MessageSender => "messageSender",
            Self::MessageReceiver => "messageReceiver",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The resolved on/off state of every [`Feature`].
///
/// Built once at startup and never mutated afterwards; every request reads
/// the same copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    /// Whether `POST /api/send` is served.
    #[serde(default)]
    pub message_sender: bool,
    /// Whether `POST /api/mc-message` is served.
    #[serde(default)]
    pub message_receiver: bool,
}

impl FeatureFlags {
    /// Look up a single flag.
    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::MessageSender => self.message_sender,
            Feature::MessageReceiver => self.message_receiver,
        }
    }

    /// Fail with the feature id when `feature` is disabled.
    pub fn require(&self, feature: Feature) -> Result<(), FeatureDisabledError> {
        if self.is_enabled(feature) {
            Ok(())
        } else {
            Err(FeatureDisabledError(feature))
        }
    }

    /// Set a single flag (used while resolving configuration).
    pub fn set(&mut self, feature: Feature, enabled: bool) {
        match feature {
            Feature::MessageSender => self.message_sender = enabled,
            Feature::MessageReceiver => self.message_receiver = enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_disabled() {
        let flags = FeatureFlags::default();
        for feature in Feature::ALL {
            assert!(!flags.is_enabled(feature));
            assert_eq!(flags.require(feature), Err(FeatureDisabledError(feature)));
        }
    }

    #[test]
    fn require_passes_for_enabled_feature() {
        let mut flags = FeatureFlags::default();
        flags.set(Feature::MessageReceiver, true);
        assert!(flags.require(Feature::MessageReceiver).is_ok());
        assert!(flags.require(Feature::MessageSender).is_err());
    }

    #[test]
    fn serializes_camel_case() {
        let flags = FeatureFlags {
            message_sender: true,
            message_receiver: false,
        };
        let json = serde_json::to_value(flags).unwrap();
        assert_eq!(json["messageSender"], true);
        assert_eq!(json["messageReceiver"], false);
        assert_eq!(
            serde_json::to_value(Feature::MessageReceiver).unwrap(),
            "messageReceiver"
        );
    }
}
