// Crypto Provider — Top-level error types
//
// Aggregates errors from the keyring, factory and provider layers into a
// single error enum for the application boundary.

use thiserror::Error;

use crate::components::{ProviderError, ValidationError};
use crate::factory::FactoryError;
use crate::keyring::KeyringError;

/// Top-level error type for wallet and CLI operations.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Keyring error: {0}")]
    Keyring(#[from] KeyringError),

    #[error("Factory error: {0}")]
    Factory(#[from] FactoryError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("record '{uid}' uses unsupported codec '{codec}'")]
    UnsupportedCodec { uid: String, codec: String },

    #[error("no provider found for address {0}")]
    AddressNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl WalletError {
    /// True for missing keyring records and unmatched address lookups.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            WalletError::Keyring(KeyringError::NotFound(_)) | WalletError::AddressNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, WalletError>;
