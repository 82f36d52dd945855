// Crypto Provider — Ed25519 key file
//
// On-disk format:
//   {"priv_key": {"type": "Ed25519", "value": "<base64>"}}
// where value is the 32-byte seed or the 64-byte seed || public key pair.
// The file is read on every signature and never cached.

use std::fs;
use std::io;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::{SigningKey, VerifyingKey, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::components::{ProviderError, PubKey};
use crate::secure_fs;

pub const KEY_TYPE_ED25519: &str = "Ed25519";

const KEYPAIR_LENGTH: usize = SECRET_KEY_LENGTH + PUBLIC_KEY_LENGTH;

#[derive(Serialize, Deserialize)]
struct KeyFile {
    priv_key: PrivKeyEntry,
}

#[derive(Serialize, Deserialize)]
struct PrivKeyEntry {
    #[serde(rename = "type")]
    key_type: String,
    value: Zeroizing<String>,
}

/// Load the signing key stored at `path`.
pub fn read_signing_key(path: &Path) -> Result<SigningKey, ProviderError> {
    let contents = Zeroizing::new(fs::read(path).map_err(|e| {
        ProviderError::KeyFile(format!("failed to read {}: {}", path.display(), e))
    })?);

    let key_file: KeyFile = serde_json::from_slice(&contents)
        .map_err(|e| ProviderError::KeyFile(format!("failed to parse key file: {}", e)))?;

    if key_file.priv_key.key_type != KEY_TYPE_ED25519 {
        return Err(ProviderError::InvalidKey(format!(
            "expected {} key, found {}",
            KEY_TYPE_ED25519, key_file.priv_key.key_type
        )));
    }

    let raw = Zeroizing::new(
        STANDARD
            .decode(key_file.priv_key.value.as_bytes())
            .map_err(|e| ProviderError::InvalidKey(format!("private key is not base64: {}", e)))?,
    );

    match raw.len() {
        SECRET_KEY_LENGTH => {
            let mut seed = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
            seed.copy_from_slice(&raw);
            Ok(SigningKey::from_bytes(&seed))
        }
        KEYPAIR_LENGTH => {
            let mut pair = Zeroizing::new([0u8; KEYPAIR_LENGTH]);
            pair.copy_from_slice(&raw);
            SigningKey::from_keypair_bytes(&pair)
                .map_err(|e| ProviderError::InvalidKey(format!("inconsistent key pair: {}", e)))
        }
        n => Err(ProviderError::InvalidKey(format!(
            "expected {} or {} byte Ed25519 key, got {} bytes",
            SECRET_KEY_LENGTH, KEYPAIR_LENGTH, n
        ))),
    }
}

/// Write `key` to `path` (0600, parent 0700).
pub fn write_signing_key(path: &Path, key: &SigningKey) -> Result<(), ProviderError> {
    let key_file = KeyFile {
        priv_key: PrivKeyEntry {
            key_type: KEY_TYPE_ED25519.to_string(),
            value: Zeroizing::new(STANDARD.encode(key.to_keypair_bytes())),
        },
    };
    let encoded = Zeroizing::new(serde_json::to_vec_pretty(&key_file)?);
    secure_fs::write_private_file(path, &encoded)?;
    Ok(())
}

/// Generate a fresh key at `path`, or adopt the key already stored there.
/// Returns the public half.
pub fn load_or_generate(path: &Path) -> Result<VerifyingKey, ProviderError> {
    match fs::metadata(path) {
        Ok(_) => {
            tracing::debug!(path = %path.display(), "Using existing key file");
            Ok(read_signing_key(path)?.verifying_key())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let mut seed = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
            rand::rng().fill_bytes(&mut seed[..]);
            let key = SigningKey::from_bytes(&seed);

            write_signing_key(path, &key)?;
            tracing::info!(path = %path.display(), "Generated Ed25519 key file");
            Ok(key.verifying_key())
        }
        Err(e) => Err(e.into()),
    }
}

/// Decode a base64 public key and check its length.
pub fn decode_public_key_bytes(encoded: &str) -> Result<[u8; PUBLIC_KEY_LENGTH], ProviderError> {
    let raw = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ProviderError::InvalidKey(format!("public key is not base64: {}", e)))?;

    raw.as_slice().try_into().map_err(|_| {
        ProviderError::InvalidKey(format!(
            "invalid public key size: expected {}, got {}",
            PUBLIC_KEY_LENGTH,
            raw.len()
        ))
    })
}

/// Same as `decode_public_key_bytes`, and the bytes must be a valid Ed25519
/// point.
pub fn decode_public_key(encoded: &str) -> Result<VerifyingKey, ProviderError> {
    let bytes = decode_public_key_bytes(encoded)?;
    VerifyingKey::from_bytes(&bytes)
        .map_err(|e| ProviderError::InvalidKey(format!("invalid Ed25519 public key: {}", e)))
}

pub fn encode_public_key(key: &VerifyingKey) -> String {
    STANDARD.encode(key.as_bytes())
}

// ─── Public Key ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePubKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

impl FilePubKey {
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self { bytes }
    }
}

impl PubKey for FilePubKey {
    fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn key_type(&self) -> &str {
        KEY_TYPE_ED25519
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
