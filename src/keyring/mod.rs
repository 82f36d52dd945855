// Crypto Provider — Keyring Module
//
// Record store behind a pluggable backend:
//   - memory: volatile, process lifetime only, no passphrase
//   - test:   file-backed, no prompt (automated tests only)
//   - file:   file-backed, gated by an interactive or piped passphrase
//   - os:     platform credential store, passphrase-gated on first bootstrap

mod error;
mod file;
mod memory;
mod os;
mod prompt;
mod record;

use std::fmt;
use std::io::{self, BufRead, IsTerminal};
use std::path::Path;
use std::str::FromStr;

pub use error::{KeyringError, KeyringResult};
pub use file::FileKeyring;
pub use memory::MemoryKeyring;
pub use os::OsKeyring;
pub use prompt::{
    read_line_from_buf, Passphrase, PassphrasePrompt, KEYHASH_FILE, MAX_PASSPHRASE_ATTEMPTS,
    MIN_PASSPHRASE_LENGTH,
};
pub use record::{Record, CODEC_JSON};

use crate::secure_fs;

const KEYRING_FILE_DIR: &str = "keyring-file";
const KEYRING_TEST_DIR: &str = "keyring-test";

// ─── Backend ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyringBackend {
    Memory,
    Test,
    #[default]
    File,
    Os,
}

impl KeyringBackend {
    pub fn variants() -> &'static [&'static str] {
        &["memory", "test", "file", "os"]
    }

    pub fn requires_passphrase(&self) -> bool {
        matches!(self, KeyringBackend::File | KeyringBackend::Os)
    }
}

impl fmt::Display for KeyringBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyringBackend::Memory => write!(f, "memory"),
            KeyringBackend::Test => write!(f, "test"),
            KeyringBackend::File => write!(f, "file"),
            KeyringBackend::Os => write!(f, "os"),
        }
    }
}

impl FromStr for KeyringBackend {
    type Err = KeyringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(KeyringBackend::Memory),
            "test" => Ok(KeyringBackend::Test),
            "file" => Ok(KeyringBackend::File),
            "os" => Ok(KeyringBackend::Os),
            _ => Err(KeyringError::InvalidBackend(s.to_string())),
        }
    }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Operations over a keyring backend.
pub trait Keyring: Send + Sync {
    /// All records, in no particular order.
    fn list(&self) -> KeyringResult<Vec<Record>>;

    /// Fails with `NotFound` when `uid` is absent.
    fn get(&self, uid: &str) -> KeyringResult<Record>;

    /// Fails with `NotFound` when `uid` is absent.
    fn delete(&self, uid: &str) -> KeyringResult<()>;

    /// Create or overwrite the record stored under `uid`.
    fn new_item(&self, uid: &str, data: &[u8], codec_type: &str) -> KeyringResult<Record>;

    fn backend(&self) -> KeyringBackend;
}

/// Open a keyring. `input` feeds the passphrase prompt when stdin is not a
/// terminal; it is ignored by the memory and test backends.
pub fn open<R: BufRead>(
    app_name: &str,
    backend: KeyringBackend,
    root_dir: &Path,
    input: R,
) -> KeyringResult<Box<dyn Keyring>> {
    open_with_mode(app_name, backend, root_dir, input, io::stdin().is_terminal())
}

/// Same as `open`, but the passphrase is always read from `input`.
pub fn open_piped<R: BufRead>(
    app_name: &str,
    backend: KeyringBackend,
    root_dir: &Path,
    input: R,
) -> KeyringResult<Box<dyn Keyring>> {
    open_with_mode(app_name, backend, root_dir, input, false)
}

fn open_with_mode<R: BufRead>(
    app_name: &str,
    backend: KeyringBackend,
    root_dir: &Path,
    input: R,
    interactive: bool,
) -> KeyringResult<Box<dyn Keyring>> {
    let keyring: Box<dyn Keyring> = match backend {
        KeyringBackend::Memory => Box::new(MemoryKeyring::new()),
        KeyringBackend::Test => Box::new(FileKeyring::new(
            &root_dir.join(KEYRING_TEST_DIR),
            KeyringBackend::Test,
        )?),
        KeyringBackend::File => {
            let dir = root_dir.join(KEYRING_FILE_DIR);
            secure_fs::ensure_private_dir(&dir)?;
            PassphrasePrompt::with_mode(&dir, input, interactive).unlock()?;
            Box::new(FileKeyring::new(&dir, KeyringBackend::File)?)
        }
        KeyringBackend::Os => {
            secure_fs::ensure_private_dir(root_dir)?;
            PassphrasePrompt::with_mode(root_dir, input, interactive).unlock()?;
            Box::new(OsKeyring::new(app_name)?)
        }
    };

    tracing::debug!(backend = %backend, app = %app_name, "Keyring opened");
    Ok(keyring)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
