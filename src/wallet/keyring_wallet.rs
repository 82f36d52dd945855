// Crypto Provider — Keyring-backed wallet
//
// Each provider is one keyring record: key = provider name, data = metadata
// JSON, codec = "json". Providers are never cached; every lookup rebuilds
// one from its metadata through the registry.

use std::io::BufRead;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::Wallet;
use crate::components::{AddressFormatter, BuildSource, CryptoProvider, ProviderMetadata};
use crate::config::WalletConfig;
use crate::error::{Result, WalletError};
use crate::factory::FactoryRegistry;
use crate::keyring::{self, Keyring, CODEC_JSON};

pub struct KeyringWallet {
    keyring: Box<dyn Keyring>,
    registry: Arc<FactoryRegistry>,
    formatter: Box<dyn AddressFormatter>,
}

impl KeyringWallet {
    pub fn new(
        keyring: Box<dyn Keyring>,
        registry: Arc<FactoryRegistry>,
        formatter: Box<dyn AddressFormatter>,
    ) -> Self {
        Self {
            keyring,
            registry,
            formatter,
        }
    }

    /// Open the keyring described by `config`. `input` answers the
    /// passphrase prompt when stdin is not a terminal.
    pub fn open<R: BufRead>(
        config: &WalletConfig,
        registry: Arc<FactoryRegistry>,
        formatter: Box<dyn AddressFormatter>,
        input: R,
    ) -> Result<Self> {
        let keyring = keyring::open(&config.app_name, config.backend, &config.root_dir, input)?;
        Ok(Self::new(keyring, registry, formatter))
    }

    pub fn registry(&self) -> &Arc<FactoryRegistry> {
        &self.registry
    }

    pub fn keyring(&self) -> &dyn Keyring {
        self.keyring.as_ref()
    }

    /// Write the provider's metadata under its name, replacing any previous
    /// record.
    pub fn store_crypto_provider(&self, provider: &dyn CryptoProvider) -> Result<()> {
        let metadata = provider.metadata();
        let data = metadata.to_json_bytes()?;
        self.keyring.new_item(&metadata.name, &data, CODEC_JSON)?;

        tracing::info!(
            name = %metadata.name,
            provider_type = %metadata.provider_type,
            "Provider stored"
        );
        Ok(())
    }

    /// Address of the provider stored under `uid`.
    pub fn address_of(&self, uid: &str) -> Result<String> {
        let metadata = self.get_provider_metadata(uid)?;
        Ok(self.formatter.format_address(&public_key_bytes(&metadata))?)
    }
}

impl Wallet for KeyringWallet {
    fn new_crypto_provider(
        &self,
        provider_type: &str,
        source: BuildSource,
    ) -> Result<Box<dyn CryptoProvider>> {
        let provider = self.registry.create_crypto_provider(provider_type, source)?;
        self.store_crypto_provider(provider.as_ref())?;
        Ok(provider)
    }

    fn get_crypto_provider(&self, uid: &str) -> Result<Box<dyn CryptoProvider>> {
        let metadata = self.get_provider_metadata(uid)?;
        let provider_type = metadata.provider_type.clone();
        Ok(self
            .registry
            .create_crypto_provider(&provider_type, BuildSource::metadata(metadata))?)
    }

    fn retrieve_crypto_provider_by_address(
        &self,
        address: &str,
    ) -> Result<Box<dyn CryptoProvider>> {
        for record in self.keyring.list()? {
            let metadata = match decode_metadata(&record.key, &record.codec_type, &record.data) {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!(key = %record.key, error = %e, "Skipping unreadable record");
                    continue;
                }
            };

            let candidate = match self.formatter.format_address(&public_key_bytes(&metadata)) {
                Ok(candidate) => candidate,
                Err(e) => {
                    tracing::warn!(key = %record.key, error = %e, "Skipping unformattable key");
                    continue;
                }
            };

            if candidate == address {
                let provider_type = metadata.provider_type.clone();
                return Ok(self
                    .registry
                    .create_crypto_provider(&provider_type, BuildSource::metadata(metadata))?);
            }
        }

        Err(WalletError::AddressNotFound(address.to_string()))
    }

    fn list_providers(&self) -> Result<Vec<String>> {
        Ok(self
            .keyring
            .list()?
            .into_iter()
            .map(|record| record.key)
            .collect())
    }

    fn delete_provider(&self, uid: &str) -> Result<()> {
        self.keyring.delete(uid)?;
        tracing::info!(name = %uid, "Provider deleted");
        Ok(())
    }

    fn get_provider_metadata(&self, uid: &str) -> Result<ProviderMetadata> {
        let record = self.keyring.get(uid)?;
        decode_metadata(&record.key, &record.codec_type, &record.data)
    }
}

fn decode_metadata(uid: &str, codec: &str, data: &[u8]) -> Result<ProviderMetadata> {
    if codec != CODEC_JSON {
        return Err(WalletError::UnsupportedCodec {
            uid: uid.to_string(),
            codec: codec.to_string(),
        });
    }
    Ok(ProviderMetadata::from_json_bytes(data)?)
}

/// Decoded public key bytes, or the raw string bytes when the stored key is
/// not base64.
fn public_key_bytes(metadata: &ProviderMetadata) -> Vec<u8> {
    STANDARD
        .decode(metadata.public_key.as_bytes())
        .unwrap_or_else(|_| metadata.public_key.as_bytes().to_vec())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
