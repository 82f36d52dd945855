// Crypto Provider — Component error types

use thiserror::Error;

/// Structural problems with caller-supplied input. Always recoverable by
/// fixing the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("provider_type is required in the configuration")]
    EmptyProviderType,

    #[error("metadata type '{found}' does not match factory type '{expected}'")]
    TypeMismatch { expected: String, found: String },
}

/// Failures raised by a live provider or one of its capabilities.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("key file error: {0}")]
    KeyFile(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("signature error: {0}")]
    Signature(String),

    #[error("address error: {0}")]
    Address(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
