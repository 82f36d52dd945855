// Crypto Provider — Wallet configuration
//
// Where the wallet keeps its state and which keyring backend it uses. The
// CLI fills this from flags; library callers build it directly.

use std::path::PathBuf;

use crate::factory::RegistrationPolicy;
use crate::keyring::KeyringBackend;

pub const DEFAULT_APP_NAME: &str = "crypto-provider";

const KEY_DIR: &str = "keys";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// Namespace for OS keyring entries.
    pub app_name: String,
    pub backend: KeyringBackend,
    /// Holds the keyring directories and provider key files.
    pub root_dir: PathBuf,
    pub registration_policy: RegistrationPolicy,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            backend: KeyringBackend::default(),
            root_dir: default_root_dir(),
            registration_policy: RegistrationPolicy::default(),
        }
    }
}

impl WalletConfig {
    pub fn with_backend(mut self, backend: KeyringBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    pub fn with_app_name(mut self, app_name: &str) -> Self {
        self.app_name = app_name.to_string();
        self
    }

    pub fn with_registration_policy(mut self, policy: RegistrationPolicy) -> Self {
        self.registration_policy = policy;
        self
    }

    /// Directory for file provider key files.
    pub fn key_dir(&self) -> PathBuf {
        self.root_dir.join(KEY_DIR)
    }
}

/// `<platform data dir>/crypto-provider`, falling back to the working
/// directory when the platform has none.
pub fn default_root_dir() -> PathBuf {
    dirs_next::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_APP_NAME)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
