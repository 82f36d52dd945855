// Crypto Provider — File provider configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::components::ProviderMetadata;
use crate::factory::FactoryError;

/// Config key holding the private key file path.
pub const CONFIG_FILEPATH: &str = "filepath";

/// Derived from `ProviderMetadata::config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileProviderConfig {
    pub filepath: String,
}

impl FileProviderConfig {
    pub fn from_metadata(metadata: &ProviderMetadata) -> Result<Self, FactoryError> {
        let config: Self = serde_json::from_value(Value::Object(metadata.config.clone()))
            .map_err(|e| FactoryError::Config(format!("file provider config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FactoryError> {
        if self.filepath.trim().is_empty() {
            return Err(FactoryError::Config("filepath cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Absolute paths are kept; relative ones are taken relative to `key_dir`.
    pub fn resolve(&self, key_dir: &Path) -> PathBuf {
        let path = Path::new(&self.filepath);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            key_dir.join(path)
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
