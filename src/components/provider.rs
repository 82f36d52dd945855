// Crypto Provider — Provider capability sets
//
// A provider is built in two phases. Factories hand the registry a
// `PendingProvider`, which carries the private `KeyInitializer` capability.
// Once keys are initialized the registry converts it into a plain
// `CryptoProvider`, so callers can never re-run initialization.

use super::{Hasher, ProviderError, ProviderMetadata, PubKey, Signer, Verifier};

/// The public capability set returned to callers.
pub trait CryptoProvider: Send + Sync {
    fn signer(&self) -> Box<dyn Signer>;

    fn verifier(&self) -> Box<dyn Verifier>;

    fn hasher(&self) -> Box<dyn Hasher>;

    fn metadata(&self) -> &ProviderMetadata;

    /// `None` until keys have been initialized.
    fn pub_key(&self) -> Option<Box<dyn PubKey>>;
}

impl std::fmt::Debug for dyn CryptoProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoProvider")
            .field("metadata", self.metadata())
            .finish_non_exhaustive()
    }
}

/// Key setup run exactly once by the registry, right after `create`.
pub trait KeyInitializer {
    fn initialize_keys(&mut self) -> Result<(), ProviderError>;
}

/// What a factory produces: a provider that still has to initialize its keys.
pub trait PendingProvider: CryptoProvider + KeyInitializer {
    /// Drop the initializer capability.
    fn into_provider(self: Box<Self>) -> Box<dyn CryptoProvider>;
}

impl<T> PendingProvider for T
where
    T: CryptoProvider + KeyInitializer + 'static,
{
    fn into_provider(self: Box<Self>) -> Box<dyn CryptoProvider> {
        self
    }
}
