// Crypto Provider — Factory error types

use thiserror::Error;

use crate::components::{ProviderError, ValidationError};

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("factory provider type must not be empty")]
    EmptyProviderType,

    #[error("a factory for provider type '{0}' is already registered")]
    DuplicateFactory(String),

    #[error("no factory registered for provider type '{0}'")]
    UnknownProviderType(String),

    #[error("provider type '{provider_type}' does not support '{source_type}' sources")]
    UnsupportedSource {
        provider_type: String,
        source_type: &'static str,
    },

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid provider configuration: {0}")]
    Config(String),

    #[error("failed to initialize keys for '{name}': {source}")]
    KeyInitialization {
        name: String,
        #[source]
        source: ProviderError,
    },

    #[error("provider '{0}' has no public key after key initialization")]
    MissingPublicKey(String),

    #[error("malformed provider configuration: {0}")]
    MalformedConfig(String),

    #[error("failed to save provider '{name}': {source}")]
    Save {
        name: String,
        #[source]
        source: ProviderError,
    },

    #[error("failed to load provider '{name}': {source}")]
    Load {
        name: String,
        #[source]
        source: ProviderError,
    },
}
