// Crypto Provider — File provider capabilities
//
// The signer holds only the key path; the verifier holds only the base64
// public key from the metadata. Nothing secret lives in memory between calls.

use std::path::PathBuf;

use ed25519_dalek::{Signature as Ed25519Signature, SIGNATURE_LENGTH};

use super::keys;
use crate::components::{
    Hasher, HasherOptions, ProviderError, Signature, Signer, SignerOptions, Verifier,
    VerifierOptions,
};

pub struct FileSigner {
    key_path: PathBuf,
}

impl FileSigner {
    pub fn new(key_path: PathBuf) -> Self {
        Self { key_path }
    }
}

impl Signer for FileSigner {
    fn sign(&self, sign_doc: &[u8], options: &SignerOptions) -> Result<Signature, ProviderError> {
        let key = keys::read_signing_key(&self.key_path)?;

        let signature: Ed25519Signature = match options.prehash {
            Some(algorithm) => ed25519_dalek::Signer::sign(&key, &algorithm.digest(sign_doc)),
            None => ed25519_dalek::Signer::sign(&key, sign_doc),
        };

        Ok(Signature::from_bytes(signature.to_bytes().to_vec()))
    }
}

pub struct FileVerifier {
    public_key: String,
}

impl FileVerifier {
    /// `public_key` is the base64 key stored in the metadata.
    pub fn new(public_key: &str) -> Self {
        Self {
            public_key: public_key.to_string(),
        }
    }
}

impl Verifier for FileVerifier {
    fn verify(
        &self,
        signature: &Signature,
        sign_doc: &[u8],
        options: &VerifierOptions,
    ) -> Result<bool, ProviderError> {
        let key = keys::decode_public_key(&self.public_key)?;

        let bytes: [u8; SIGNATURE_LENGTH] = signature.as_bytes().try_into().map_err(|_| {
            ProviderError::Signature(format!(
                "expected {} byte signature, got {}",
                SIGNATURE_LENGTH,
                signature.as_bytes().len()
            ))
        })?;
        let signature = Ed25519Signature::from_bytes(&bytes);

        let verified = match options.prehash {
            Some(algorithm) => {
                ed25519_dalek::Verifier::verify(&key, &algorithm.digest(sign_doc), &signature)
            }
            None => ed25519_dalek::Verifier::verify(&key, sign_doc, &signature),
        };

        Ok(verified.is_ok())
    }
}

pub struct FileHasher;

impl Hasher for FileHasher {
    fn hash(&self, input: &[u8], options: &HasherOptions) -> Result<Vec<u8>, ProviderError> {
        Ok(options.algorithm.digest(input))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::HashAlgorithm;

    fn signer_and_verifier() -> (tempfile::TempDir, FileSigner, FileVerifier) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("k.json");
        let public = keys::load_or_generate(&path).unwrap();

        let verifier = FileVerifier::new(&keys::encode_public_key(&public));
        (dir, FileSigner::new(path), verifier)
    }

    #[test]
    fn test_sign_and_verify() {
        let (_dir, signer, verifier) = signer_and_verifier();

        let sig = signer.sign(b"hello", &SignerOptions::default()).unwrap();
        assert_eq!(sig.as_bytes().len(), SIGNATURE_LENGTH);

        assert!(verifier.verify(&sig, b"hello", &VerifierOptions::default()).unwrap());
        assert!(!verifier.verify(&sig, b"hellO", &VerifierOptions::default()).unwrap());
    }

    #[test]
    fn test_prehash_must_match() {
        let (_dir, signer, verifier) = signer_and_verifier();

        let opts = SignerOptions::default().with_prehash(HashAlgorithm::Sha512);
        let sig = signer.sign(b"doc", &opts).unwrap();

        let matching = VerifierOptions::default().with_prehash(HashAlgorithm::Sha512);
        assert!(verifier.verify(&sig, b"doc", &matching).unwrap());
        assert!(!verifier.verify(&sig, b"doc", &VerifierOptions::default()).unwrap());
    }

    #[test]
    fn test_signer_fails_when_key_file_is_gone() {
        let (dir, signer, _verifier) = signer_and_verifier();
        std::fs::remove_file(dir.path().join("k.json")).unwrap();

        assert!(matches!(
            signer.sign(b"x", &SignerOptions::default()),
            Err(ProviderError::KeyFile(_))
        ));
    }

    #[test]
    fn test_malformed_signature_length() {
        let (_dir, _signer, verifier) = signer_and_verifier();
        let result = verifier.verify(
            &Signature::from_bytes(vec![0u8; 10]),
            b"x",
            &VerifierOptions::default(),
        );
        assert!(matches!(result, Err(ProviderError::Signature(_))));
    }

    #[test]
    fn test_hasher_algorithms() {
        let sha256 = FileHasher.hash(b"abc", &HasherOptions::default()).unwrap();
        assert_eq!(
            hex::encode(sha256),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );

        let sha512 = FileHasher
            .hash(
                b"abc",
                &HasherOptions::default().with_algorithm(HashAlgorithm::Sha512),
            )
            .unwrap();
        assert_eq!(sha512.len(), 64);
    }
}
