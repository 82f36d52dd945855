// Crypto Provider — Metadata file store
//
// Shared persistence for factory `save` hooks: one pretty-printed JSON file
// per provider at `<base_dir>/<name>.json`, owner-only.

use std::fs;
use std::path::{Path, PathBuf};

use super::FactoryError;
use crate::components::{ProviderError, ProviderMetadata};
use crate::secure_fs;

#[derive(Debug, Clone)]
pub struct MetadataFileStore {
    base_dir: PathBuf,
}

impl MetadataFileStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the file for `name`. Names that would escape `base_dir` are
    /// rejected.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, FactoryError> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(FactoryError::Config(format!(
                "'{}' cannot be used as a file name",
                name
            )));
        }
        Ok(self.base_dir.join(format!("{}.json", name)))
    }

    pub fn save(&self, metadata: &ProviderMetadata) -> Result<PathBuf, FactoryError> {
        let path = self.path_for(&metadata.name)?;
        let save_err = |source: ProviderError| FactoryError::Save {
            name: metadata.name.clone(),
            source,
        };

        let encoded = serde_json::to_vec_pretty(metadata).map_err(|e| save_err(e.into()))?;
        secure_fs::write_private_file(&path, &encoded).map_err(|e| save_err(e.into()))?;

        tracing::info!(name = %metadata.name, path = %path.display(), "Provider metadata saved");
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<ProviderMetadata, FactoryError> {
        let path = self.path_for(name)?;
        let load_err = |source: ProviderError| FactoryError::Load {
            name: name.to_string(),
            source,
        };

        let contents = fs::read(&path).map_err(|e| load_err(e.into()))?;
        ProviderMetadata::from_json_bytes(&contents).map_err(|e| load_err(e.into()))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
