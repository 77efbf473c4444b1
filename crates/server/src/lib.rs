pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod feature_gate;
pub mod lifecycle;
pub mod logging;
