// Crypto Provider — Components Module
//
// The capability sets every provider type exposes, the metadata record that
// makes a provider durable, and the build sources a factory consumes.

mod address;
mod capability;
mod error;
mod metadata;
mod provider;
mod source;

pub use address::{Sha256AddressFormatter, ADDRESS_SIZE};
pub use capability::{
    AddressFormatter, HashAlgorithm, Hasher, HasherOptions, PubKey, Signature, Signer,
    SignerOptions, Verifier, VerifierOptions, OPTIONS_VERSION,
};
pub use error::{ProviderError, ValidationError};
pub use metadata::{parse_version, ProviderConfig, ProviderMetadata};
pub use provider::{CryptoProvider, KeyInitializer, PendingProvider};
pub use source::{
    BuildSource, CryptoProviderConfig, SOURCE_CONFIG, SOURCE_JSON, SOURCE_METADATA,
    SOURCE_MNEMONIC, SOURCE_NEW,
};
