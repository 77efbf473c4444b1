pub mod error;
pub mod feature;
pub mod filter;
pub mod health;
pub mod message;

pub use error::{FeatureDisabledError, FilterError, ValidationError};
pub use feature::{Feature, FeatureFlags};
pub use filter::{ContentFilter, DEFAULT_BLOCKLIST};
pub use health::HealthSnapshot;
pub use message::{MAX_MESSAGE_CHARS, Message, ReceiptAck, RelayRequest, iso8601};
