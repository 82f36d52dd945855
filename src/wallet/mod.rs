// Crypto Provider — Wallet Module
//
// Persists provider metadata in a keyring and rebuilds live providers from
// it on demand.

mod keyring_wallet;

pub use keyring_wallet::KeyringWallet;

use crate::components::{BuildSource, CryptoProvider, ProviderMetadata};
use crate::error::Result;

/// Provider lifecycle over a persistent store.
pub trait Wallet {
    /// Create a provider through the registry and persist its metadata
    /// under the provider's name.
    fn new_crypto_provider(
        &self,
        provider_type: &str,
        source: BuildSource,
    ) -> Result<Box<dyn CryptoProvider>>;

    /// Rebuild the provider stored under `uid`.
    fn get_crypto_provider(&self, uid: &str) -> Result<Box<dyn CryptoProvider>>;

    /// First stored provider whose formatted public key equals `address`.
    fn retrieve_crypto_provider_by_address(&self, address: &str)
        -> Result<Box<dyn CryptoProvider>>;

    /// Stored identifiers, in no particular order.
    fn list_providers(&self) -> Result<Vec<String>>;

    fn delete_provider(&self, uid: &str) -> Result<()>;

    /// Stored metadata without rebuilding the provider.
    fn get_provider_metadata(&self, uid: &str) -> Result<ProviderMetadata>;
}
