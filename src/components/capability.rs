// Crypto Provider — Capability interfaces
//
// Signer, Verifier, Hasher and PubKey are what callers get out of a provider.
// Options are closed structs instead of open maps so every recognized setting
// is visible in the type.

use std::fmt;

use sha2::{Digest, Sha256, Sha512};

use super::ProviderError;

/// Version of the option structs below. Bumped whenever a recognized option
/// is added or its meaning changes.
pub const OPTIONS_VERSION: u16 = 1;

// ─── Options ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub fn digest(self, input: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha256 => Sha256::digest(input).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(input).to_vec(),
        }
    }

    pub fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha512 => 64,
        }
    }
}

/// Options recognized by `Signer::sign`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct SignerOptions {
    /// Sign the digest of the document instead of the document itself.
    pub prehash: Option<HashAlgorithm>,
}

impl SignerOptions {
    pub fn with_prehash(mut self, algorithm: HashAlgorithm) -> Self {
        self.prehash = Some(algorithm);
        self
    }

    pub fn version(&self) -> u16 {
        OPTIONS_VERSION
    }
}

/// Options recognized by `Verifier::verify`. `prehash` must match the value
/// used when signing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct VerifierOptions {
    pub prehash: Option<HashAlgorithm>,
}

impl VerifierOptions {
    pub fn with_prehash(mut self, algorithm: HashAlgorithm) -> Self {
        self.prehash = Some(algorithm);
        self
    }

    pub fn version(&self) -> u16 {
        OPTIONS_VERSION
    }
}

/// Options recognized by `Hasher::hash`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct HasherOptions {
    pub algorithm: HashAlgorithm,
}

impl HasherOptions {
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn version(&self) -> u16 {
        OPTIONS_VERSION
    }
}

// ─── Signature ───────────────────────────────────────────────────────────────

/// Raw signature bytes produced by a `Signer`.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn from_hex(encoded: &str) -> Result<Self, ProviderError> {
        hex::decode(encoded.trim())
            .map(Self)
            .map_err(|e| ProviderError::Signature(format!("invalid hex signature: {}", e)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

pub trait Signer: Send + Sync {
    fn sign(&self, sign_doc: &[u8], options: &SignerOptions) -> Result<Signature, ProviderError>;
}

pub trait Verifier: Send + Sync {
    /// `Ok(false)` means the signature is well-formed but does not match.
    fn verify(
        &self,
        signature: &Signature,
        sign_doc: &[u8],
        options: &VerifierOptions,
    ) -> Result<bool, ProviderError>;
}

pub trait Hasher: Send + Sync {
    fn hash(&self, input: &[u8], options: &HasherOptions) -> Result<Vec<u8>, ProviderError>;
}

pub trait PubKey: Send + Sync + fmt::Debug {
    fn bytes(&self) -> &[u8];

    fn key_type(&self) -> &str;

    fn equals(&self, other: &dyn PubKey) -> bool {
        self.key_type() == other.key_type() && self.bytes() == other.bytes()
    }
}

/// Turns public key bytes into a human-facing address string.
pub trait AddressFormatter: Send + Sync {
    fn format_address(&self, pub_key: &[u8]) -> Result<String, ProviderError>;
}

// ─── Tests ───────────────────────────────────────────────────────────────────
