// Crypto Provider — File provider
//
// Ed25519 keys kept in a JSON key file on local disk. The metadata carries
// the base64 public key and the key file path.

use std::path::{Path, PathBuf};

use super::keys::{self, FilePubKey};
use super::signer::{FileHasher, FileSigner, FileVerifier};
use crate::components::{
    CryptoProvider, Hasher, KeyInitializer, ProviderError, ProviderMetadata, PubKey, Signer,
    Verifier,
};

pub struct FileProvider {
    metadata: ProviderMetadata,
    key_path: PathBuf,
}

impl FileProvider {
    /// Uninitialized provider. `key_path` is the resolved key file location.
    pub(crate) fn new(metadata: ProviderMetadata, key_path: PathBuf) -> Self {
        Self { metadata, key_path }
    }

    pub fn key_path(&self) -> &Path {
        &self.key_path
    }
}

impl CryptoProvider for FileProvider {
    fn signer(&self) -> Box<dyn Signer> {
        Box::new(FileSigner::new(self.key_path.clone()))
    }

    fn verifier(&self) -> Box<dyn Verifier> {
        Box::new(FileVerifier::new(&self.metadata.public_key))
    }

    fn hasher(&self) -> Box<dyn Hasher> {
        Box::new(FileHasher)
    }

    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    fn pub_key(&self) -> Option<Box<dyn PubKey>> {
        if self.metadata.public_key.is_empty() {
            return None;
        }
        keys::decode_public_key_bytes(&self.metadata.public_key)
            .ok()
            .map(|bytes| Box::new(FilePubKey::from_bytes(bytes)) as Box<dyn PubKey>)
    }
}

impl KeyInitializer for FileProvider {
    /// Fresh providers get a key file (an existing file at the path is
    /// adopted, never overwritten). Providers rebuilt from metadata only
    /// have the size of their stored public key checked.
    fn initialize_keys(&mut self) -> Result<(), ProviderError> {
        if self.metadata.public_key.is_empty() {
            let public = keys::load_or_generate(&self.key_path)?;
            self.metadata.public_key = keys::encode_public_key(&public);
            return Ok(());
        }

        keys::decode_public_key_bytes(&self.metadata.public_key)?;
        Ok(())
    }
}
