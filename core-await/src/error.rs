use thiserror::Error;

/// Errors raised while building an await adapter or its ambient setup.
///
/// Failures of the wrapped computation never appear here; they are handed
/// back unchanged through [`TaskOutcome`](bridge_traits::TaskOutcome).
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Invalid input: awaitable must not be null")]
    InvalidInput,

    #[error("Unsupported awaitable: {type_name} is not a recognized task type")]
    UnsupportedAwaitable { type_name: String },

    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
