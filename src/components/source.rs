// Crypto Provider — Build sources
//
// A BuildSource describes how a provider should be constructed. Factories
// match on it exhaustively, so a new variant is a compile error at every
// factory until it is handled.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zeroize::Zeroizing;

use super::{ProviderMetadata, ValidationError};

pub const SOURCE_NEW: &str = "new";
pub const SOURCE_METADATA: &str = "metadata";
pub const SOURCE_MNEMONIC: &str = "mnemonic";
pub const SOURCE_JSON: &str = "json";
pub const SOURCE_CONFIG: &str = "config";

/// The `{provider_type, options}` envelope accepted by
/// `FactoryRegistry::load_crypto_provider`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoProviderConfig {
    pub provider_type: String,
    pub options: Map<String, Value>,
}

#[derive(Clone)]
pub enum BuildSource {
    /// A fresh provider with default values.
    New { name: String },
    /// Metadata previously produced by a factory.
    Metadata { metadata: ProviderMetadata },
    /// A BIP-39 recovery phrase.
    Mnemonic { phrase: Zeroizing<String> },
    /// Raw JSON, parsed by the factory once it knows the concrete shape.
    Json { raw: String },
    /// A generic configuration map.
    Config {
        provider_type: String,
        options: Map<String, Value>,
    },
}

impl BuildSource {
    pub fn new(name: impl Into<String>) -> Self {
        BuildSource::New { name: name.into() }
    }

    pub fn metadata(metadata: ProviderMetadata) -> Self {
        BuildSource::Metadata { metadata }
    }

    pub fn mnemonic(phrase: impl Into<String>) -> Self {
        BuildSource::Mnemonic {
            phrase: Zeroizing::new(phrase.into()),
        }
    }

    pub fn json(raw: impl Into<String>) -> Self {
        BuildSource::Json { raw: raw.into() }
    }

    pub fn config(config: CryptoProviderConfig) -> Self {
        BuildSource::Config {
            provider_type: config.provider_type,
            options: config.options,
        }
    }

    /// Stable discriminator used for routing and diagnostics.
    pub fn source_type(&self) -> &'static str {
        match self {
            BuildSource::New { .. } => SOURCE_NEW,
            BuildSource::Metadata { .. } => SOURCE_METADATA,
            BuildSource::Mnemonic { .. } => SOURCE_MNEMONIC,
            BuildSource::Json { .. } => SOURCE_JSON,
            BuildSource::Config { .. } => SOURCE_CONFIG,
        }
    }

    /// Shallow, variant-local structural check. Knows nothing about
    /// factory-specific rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            BuildSource::New { name } => {
                if name.is_empty() {
                    return Err(ValidationError::MissingField("name"));
                }
                Ok(())
            }
            BuildSource::Metadata { metadata } => metadata.validate(),
            BuildSource::Mnemonic { phrase } => {
                if phrase.trim().is_empty() {
                    return Err(ValidationError::MissingField("mnemonic"));
                }
                bip39::Mnemonic::parse_normalized(phrase.trim())
                    .map(|_| ())
                    .map_err(|e| ValidationError::InvalidMnemonic(e.to_string()))
            }
            BuildSource::Json { raw } => serde_json::from_str::<Map<String, Value>>(raw)
                .map(|_| ())
                .map_err(|e| ValidationError::InvalidJson(e.to_string())),
            BuildSource::Config { provider_type, .. } => {
                if provider_type.is_empty() {
                    return Err(ValidationError::EmptyProviderType);
                }
                Ok(())
            }
        }
    }
}

/// Never prints the mnemonic phrase.
impl fmt::Debug for BuildSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildSource::New { name } => f.debug_struct("New").field("name", name).finish(),
            BuildSource::Metadata { metadata } => f
                .debug_struct("Metadata")
                .field("metadata", metadata)
                .finish(),
            BuildSource::Mnemonic { .. } => f
                .debug_struct("Mnemonic")
                .field("phrase", &"[REDACTED]")
                .finish(),
            BuildSource::Json { raw } => f.debug_struct("Json").field("raw", raw).finish(),
            BuildSource::Config {
                provider_type,
                options,
            } => f
                .debug_struct("Config")
                .field("provider_type", provider_type)
                .field("options", options)
                .finish(),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
