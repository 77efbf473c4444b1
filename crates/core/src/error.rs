use thiserror::Error;

use crate::feature::Feature;

/// Rejections raised while validating a message payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field (`player` or `message`) was absent or empty.
    #[error("missing required parameters")]
    MissingParams,

    /// The outbound message text was empty.
    #[error("message must not be empty")]
    EmptyMessage,

    /// The outbound message text exceeded the character limit.
    #[error("message is {length} characters, limit is {max}")]
    TooLong { length: usize, max: usize },

    /// The request body was not valid JSON for the endpoint.
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

/// Rejection raised by the content filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The message contained a blocked term.
    #[error("message contains blocked content")]
    FilteredContent {
        /// The blocklist entry that matched (lowercase).
        term: String,
    },
}

/// A request targeted a capability that is disabled for this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("feature not enabled: {0}")]
pub struct FeatureDisabledError(pub Feature);
