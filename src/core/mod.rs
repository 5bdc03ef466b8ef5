//! Core abstractions shared across the client

pub mod cache;
pub mod config;
pub mod envelope;
pub mod format;
pub mod log;

pub use config::AppConfig;
pub use envelope::{ApiError, Envelope};
