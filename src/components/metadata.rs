// Crypto Provider — Provider metadata
//
// ProviderMetadata is the only durable part of a provider. It is written to
// the keyring as JSON and read back to rebuild a live instance.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ValidationError;

/// Free-form, provider-specific configuration carried inside the metadata.
pub type ProviderConfig = Map<String, Value>;

/// Identity and configuration of a provider.
///
/// Missing JSON fields deserialize to their empty defaults so that
/// `validate()` can report the first violated invariant instead of a
/// serde error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderMetadata {
    pub version: String,
    pub name: String,
    #[serde(rename = "type")]
    pub provider_type: String,
    #[serde(rename = "publickey")]
    pub public_key: String,
    pub config: ProviderConfig,
}

impl ProviderMetadata {
    /// Metadata for a provider whose keys do not exist yet.
    pub fn new(version: &str, provider_type: &str, name: &str) -> Self {
        Self {
            version: version.to_string(),
            name: name.to_string(),
            provider_type: provider_type.to_string(),
            public_key: String::new(),
            config: ProviderConfig::new(),
        }
    }

    pub fn with_config(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.config.insert(key.to_string(), value.into());
        self
    }

    /// Check every invariant, in order: version, name, type, public key.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_identity()?;
        if self.public_key.is_empty() {
            return Err(ValidationError::MissingField("publickey"));
        }
        Ok(())
    }

    /// Same as `validate()` minus the public key, which a freshly created
    /// provider only receives during key initialization.
    pub fn validate_identity(&self) -> Result<(), ValidationError> {
        parse_version(&self.version)?;
        if self.name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.provider_type.is_empty() {
            return Err(ValidationError::MissingField("type"));
        }
        Ok(())
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_json_bytes(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

/// Parse a semantic version, tolerating a leading `v` (`v1.0.0`).
pub fn parse_version(raw: &str) -> Result<semver::Version, ValidationError> {
    let trimmed = raw
        .strip_prefix('v')
        .or_else(|| raw.strip_prefix('V'))
        .unwrap_or(raw);

    semver::Version::parse(trimmed).map_err(|e| ValidationError::InvalidVersion {
        version: raw.to_string(),
        reason: e.to_string(),
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
