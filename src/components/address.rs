// Crypto Provider — Address formatting
//
// Address = first 20 bytes of SHA-256(public key), hex encoded.

use sha2::{Digest, Sha256};

use super::{AddressFormatter, ProviderError};

/// Length in bytes of the truncated hash used as an address.
pub const ADDRESS_SIZE: usize = 20;

#[derive(Debug, Clone, Default)]
pub struct Sha256AddressFormatter {
    prefix: String,
}

impl Sha256AddressFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `prefix` to every formatted address (e.g. `"addr_"`).
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }
}

impl AddressFormatter for Sha256AddressFormatter {
    fn format_address(&self, pub_key: &[u8]) -> Result<String, ProviderError> {
        if pub_key.is_empty() {
            return Err(ProviderError::Address("public key is empty".to_string()));
        }

        let digest = Sha256::digest(pub_key);
        Ok(format!("{}{}", self.prefix, hex::encode(&digest[..ADDRESS_SIZE])))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
