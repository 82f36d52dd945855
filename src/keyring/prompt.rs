// Crypto Provider — Keyring passphrase prompt
//
// Gates an on-disk keyring behind a passphrase. The first run asks for the
// passphrase twice and stores an Argon2id hash in `<dir>/keyhash`; later runs
// verify against that hash. Every path shares one bounded attempt budget.
//
// Interactive terminals get echo-suppressed entry. Piped input is read one
// line at a time from a single buffered reader that lives as long as the
// prompt, so the confirmation line is never swallowed by the first read.

use std::fmt;
use std::fs;
use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use super::{KeyringError, KeyringResult};
use crate::secure_fs;

pub const MAX_PASSPHRASE_ATTEMPTS: u32 = 3;

pub const MIN_PASSPHRASE_LENGTH: usize = 8;

/// File holding the passphrase verification hash.
pub const KEYHASH_FILE: &str = "keyhash";

const SALT_LEN: usize = 16;

// ─── Passphrase ──────────────────────────────────────────────────────────────

/// A passphrase that is zeroized on drop and never shown by `Debug`.
#[derive(Clone)]
pub struct Passphrase(Zeroizing<String>);

impl Passphrase {
    pub fn new(value: String) -> Self {
        Self(Zeroizing::new(value))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase([REDACTED])")
    }
}

impl PartialEq for Passphrase {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

// ─── Prompt ──────────────────────────────────────────────────────────────────

pub struct PassphrasePrompt<R> {
    keyhash_path: PathBuf,
    input: R,
    interactive: bool,
}

impl<R: BufRead> PassphrasePrompt<R> {
    /// Prompt for the keyring in `dir`. Uses the terminal when stdin is one,
    /// otherwise reads lines from `input`.
    pub fn new(dir: &Path, input: R) -> Self {
        Self::with_mode(dir, input, io::stdin().is_terminal())
    }

    /// Always read from `input`, even if a terminal is attached.
    pub fn non_interactive(dir: &Path, input: R) -> Self {
        Self::with_mode(dir, input, false)
    }

    pub(crate) fn with_mode(dir: &Path, input: R, interactive: bool) -> Self {
        Self {
            keyhash_path: dir.join(KEYHASH_FILE),
            input,
            interactive,
        }
    }

    /// Run the prompt until a passphrase is accepted or the attempt budget
    /// is exhausted.
    pub fn unlock(&mut self) -> KeyringResult<Passphrase> {
        let stored_hash = match fs::read_to_string(&self.keyhash_path) {
            Ok(hash) => Some(hash),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        for attempt in 1..=MAX_PASSPHRASE_ATTEMPTS {
            let prompt = format!(
                "Enter keyring passphrase (attempt {}/{}): ",
                attempt, MAX_PASSPHRASE_ATTEMPTS
            );

            let pass = match self.read_passphrase(&prompt) {
                Ok(pass) => pass,
                Err(KeyringError::InputExhausted) => return Err(KeyringError::InputExhausted),
                Err(e) => {
                    eprintln!("{}", e);
                    continue;
                }
            };

            if let Some(hash) = &stored_hash {
                if verify_passphrase(&pass, hash)? {
                    tracing::debug!("Keyring passphrase verified");
                    return Ok(pass);
                }
                eprintln!("{}", KeyringError::IncorrectPassphrase);
                continue;
            }

            let confirmation = match self.read_passphrase("Re-enter keyring passphrase: ") {
                Ok(pass) => pass,
                Err(KeyringError::InputExhausted) => return Err(KeyringError::InputExhausted),
                Err(e) => {
                    eprintln!("{}", e);
                    continue;
                }
            };

            if pass != confirmation {
                eprintln!("{}", KeyringError::PassphraseMismatch);
                continue;
            }

            let hash = hash_passphrase(&pass)?;
            secure_fs::write_private_file(&self.keyhash_path, hash.as_bytes())?;
            tracing::info!(path = %self.keyhash_path.display(), "Keyring passphrase hash stored");

            return Ok(pass);
        }

        Err(KeyringError::TooManyAttempts)
    }

    /// Read one passphrase and enforce the minimum length. A too-short entry
    /// is returned inside the error.
    fn read_passphrase(&mut self, prompt: &str) -> KeyringResult<Passphrase> {
        let raw = if self.interactive {
            rpassword::prompt_password(prompt)?
        } else {
            read_line_from_buf(&mut self.input)?
        };
        let pass = Passphrase::new(raw);

        if pass.len() < MIN_PASSPHRASE_LENGTH {
            return Err(KeyringError::PassphraseTooShort {
                min: MIN_PASSPHRASE_LENGTH,
                entered: pass,
            });
        }

        Ok(pass)
    }
}

/// Read a single line, leaving anything after the newline in the buffer.
/// A final line without a trailing newline is accepted; end of input with
/// nothing read is `InputExhausted`.
pub fn read_line_from_buf<R: BufRead>(buf: &mut R) -> KeyringResult<String> {
    let mut line = String::new();
    let read = buf.read_line(&mut line)?;
    if read == 0 {
        return Err(KeyringError::InputExhausted);
    }

    let trimmed = line.trim().to_string();
    line.zeroize();
    Ok(trimmed)
}

fn hash_passphrase(pass: &Passphrase) -> KeyringResult<String> {
    let mut salt_bytes = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| KeyringError::Hash(e.to_string()))?;
    let hash = Argon2::default()
        .hash_password(pass.expose().as_bytes(), &salt)
        .map_err(|e| KeyringError::Hash(e.to_string()))?;

    Ok(hash.to_string())
}

fn verify_passphrase(pass: &Passphrase, stored_hash: &str) -> KeyringResult<bool> {
    let parsed =
        PasswordHash::new(stored_hash.trim()).map_err(|e| KeyringError::Hash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(pass.expose().as_bytes(), &parsed)
        .is_ok())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
