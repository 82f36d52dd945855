// Crypto Provider — File provider factory

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::config::{FileProviderConfig, CONFIG_FILEPATH};
use super::provider::FileProvider;
use super::{PROVIDER_TYPE_FILE, VERSION};
use crate::components::{
    BuildSource, CryptoProvider, PendingProvider, ProviderMetadata, ValidationError,
    SOURCE_CONFIG, SOURCE_JSON, SOURCE_METADATA, SOURCE_NEW,
};
use crate::factory::{FactoryError, MetadataFileStore, ProviderFactory};

const METADATA_DIR: &str = "metadata";

pub struct FileProviderFactory {
    key_dir: PathBuf,
    store: MetadataFileStore,
}

impl FileProviderFactory {
    /// New key files go to `<key_dir>/<name>.json`; relative `filepath`
    /// values resolve against `key_dir`; `save` writes to
    /// `<key_dir>/metadata/<name>.json`.
    pub fn new(key_dir: &Path) -> Self {
        Self {
            key_dir: key_dir.to_path_buf(),
            store: MetadataFileStore::new(key_dir.join(METADATA_DIR)),
        }
    }

    pub fn key_dir(&self) -> &Path {
        &self.key_dir
    }

    fn default_metadata(&self, name: &str) -> Result<ProviderMetadata, FactoryError> {
        let key_path = MetadataFileStore::new(&self.key_dir).path_for(name)?;
        let metadata = ProviderMetadata::new(VERSION, PROVIDER_TYPE_FILE, name)
            .with_config(CONFIG_FILEPATH, key_path.display().to_string());
        metadata.validate_identity()?;
        Ok(metadata)
    }

    fn build(&self, metadata: ProviderMetadata) -> Result<FileProvider, FactoryError> {
        if metadata.provider_type != PROVIDER_TYPE_FILE {
            return Err(ValidationError::TypeMismatch {
                expected: PROVIDER_TYPE_FILE.to_string(),
                found: metadata.provider_type,
            }
            .into());
        }

        let config = FileProviderConfig::from_metadata(&metadata)?;
        let key_path = config.resolve(&self.key_dir);
        Ok(FileProvider::new(metadata, key_path))
    }
}

impl ProviderFactory for FileProviderFactory {
    fn create(&self, source: BuildSource) -> Result<Box<dyn PendingProvider>, FactoryError> {
        let metadata = match source {
            BuildSource::New { name } => self.default_metadata(&name)?,
            BuildSource::Metadata { metadata } => {
                metadata.validate()?;
                metadata
            }
            BuildSource::Json { raw } => {
                let metadata: ProviderMetadata = serde_json::from_str(&raw)
                    .map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
                metadata.validate()?;
                metadata
            }
            BuildSource::Config { options, .. } => {
                let metadata: ProviderMetadata = serde_json::from_value(Value::Object(options))
                    .map_err(|e| FactoryError::Config(e.to_string()))?;
                metadata.validate()?;
                metadata
            }
            source @ BuildSource::Mnemonic { .. } => {
                return Err(FactoryError::UnsupportedSource {
                    provider_type: PROVIDER_TYPE_FILE.to_string(),
                    source_type: source.source_type(),
                })
            }
        };

        Ok(Box::new(self.build(metadata)?))
    }

    fn provider_type(&self) -> &str {
        PROVIDER_TYPE_FILE
    }

    fn supported_sources(&self) -> Vec<&'static str> {
        vec![SOURCE_NEW, SOURCE_METADATA, SOURCE_JSON, SOURCE_CONFIG]
    }

    fn save(&self, provider: &dyn CryptoProvider) -> Result<(), FactoryError> {
        self.store.save(provider.metadata())?;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use ed25519_dalek::SigningKey;

    use crate::components::{SignerOptions, VerifierOptions};
    use crate::factory::FactoryRegistry;

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon \
                          abandon abandon abandon abandon abandon about";

    fn registry(dir: &Path) -> FactoryRegistry {
        let registry = FactoryRegistry::default();
        registry
            .register_factory(Arc::new(FileProviderFactory::new(dir)))
            .unwrap();
        registry
    }

    fn public_key_b64(seed: u8) -> String {
        STANDARD.encode(SigningKey::from_bytes(&[seed; 32]).verifying_key().as_bytes())
    }

    #[test]
    fn test_new_generates_key_file_and_signs() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());

        let provider = registry
            .create_crypto_provider("file", BuildSource::new("k1"))
            .unwrap();

        let metadata = provider.metadata();
        assert_eq!(metadata.version, VERSION);
        assert_eq!(metadata.provider_type, "file");
        assert_eq!(metadata.name, "k1");
        assert!(!metadata.public_key.is_empty());
        assert!(dir.path().join("k1.json").exists());
        assert_eq!(provider.pub_key().unwrap().bytes().len(), 32);

        let sig = provider
            .signer()
            .sign(b"payload", &SignerOptions::default())
            .unwrap();
        assert!(provider
            .verifier()
            .verify(&sig, b"payload", &VerifierOptions::default())
            .unwrap());
    }

    #[test]
    fn test_new_adopts_existing_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());

        let first = registry
            .create_crypto_provider("file", BuildSource::new("k1"))
            .unwrap();
        let second = registry
            .create_crypto_provider("file", BuildSource::new("k1"))
            .unwrap();
        assert_eq!(first.metadata().public_key, second.metadata().public_key);
    }

    #[test]
    fn test_new_rejects_path_like_names() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());

        assert!(matches!(
            registry.create_crypto_provider("file", BuildSource::new("../escape")),
            Err(FactoryError::Config(_))
        ));
    }

    #[test]
    fn test_json_source_keeps_public_key() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());
        let public_key = public_key_b64(3);

        let raw = format!(
            r#"{{"version":"v1.0.0","name":"k1","type":"file","publickey":"{}","config":{{"filepath":"key.json"}}}}"#,
            public_key
        );
        let provider = registry
            .create_crypto_provider("file", BuildSource::json(raw))
            .unwrap();

        assert_eq!(provider.metadata().public_key, public_key);
        // Rebuilding from metadata never touches the key file
        assert!(!dir.path().join("key.json").exists());
    }

    #[test]
    fn test_metadata_source_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());

        let created = registry
            .create_crypto_provider("file", BuildSource::new("k1"))
            .unwrap();
        let rebuilt = registry
            .create_crypto_provider("file", BuildSource::metadata(created.metadata().clone()))
            .unwrap();
        assert_eq!(rebuilt.metadata(), created.metadata());

        let sig = rebuilt
            .signer()
            .sign(b"m", &SignerOptions::default())
            .unwrap();
        assert!(created
            .verifier()
            .verify(&sig, b"m", &VerifierOptions::default())
            .unwrap());
    }

    #[test]
    fn test_empty_filepath_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());

        let metadata = ProviderMetadata {
            public_key: public_key_b64(1),
            ..ProviderMetadata::new("v1.0.0", "file", "k1")
        }
        .with_config(CONFIG_FILEPATH, "");

        assert!(matches!(
            registry.create_crypto_provider("file", BuildSource::metadata(metadata)),
            Err(FactoryError::Config(_))
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());

        let metadata = ProviderMetadata {
            public_key: public_key_b64(1),
            ..ProviderMetadata::new("v1.0.0", "ledger", "k1")
        }
        .with_config(CONFIG_FILEPATH, "k1.json");

        assert!(matches!(
            registry.create_crypto_provider("file", BuildSource::metadata(metadata)),
            Err(FactoryError::Validation(ValidationError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn test_invalid_public_key_fails_initialization() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());

        let metadata = ProviderMetadata {
            public_key: STANDARD.encode([1u8; 16]),
            ..ProviderMetadata::new("v1.0.0", "file", "k1")
        }
        .with_config(CONFIG_FILEPATH, "k1.json");

        assert!(matches!(
            registry.create_crypto_provider("file", BuildSource::metadata(metadata)),
            Err(FactoryError::KeyInitialization { .. })
        ));
    }

    #[test]
    fn test_mnemonic_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());

        assert!(matches!(
            registry.create_crypto_provider("file", BuildSource::mnemonic(PHRASE)),
            Err(FactoryError::UnsupportedSource { source_type: "mnemonic", .. })
        ));
    }

    #[test]
    fn test_load_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());

        let raw = format!(
            r#"{{"provider_type":"file","options":{{"version":"v1.0.0","name":"k2","type":"file","publickey":"{}","config":{{"filepath":"k2.json"}}}}}}"#,
            public_key_b64(5)
        );
        let provider = registry.load_crypto_provider(&raw).unwrap();
        assert_eq!(provider.metadata().name, "k2");
    }

    #[test]
    fn test_save_writes_metadata_file() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(dir.path());

        let provider = registry
            .create_crypto_provider("file", BuildSource::new("k1"))
            .unwrap();
        registry.save_provider(provider.as_ref()).unwrap();

        let saved = MetadataFileStore::new(dir.path().join(METADATA_DIR))
            .load("k1")
            .unwrap();
        assert_eq!(&saved, provider.metadata());
    }
}
