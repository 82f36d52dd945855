// Crypto Provider — CLI Module
//
// Command-line interface using clap derive macros.
// Subcommands: factories, list, register, show, delete, sign, verify,
// address, find, load.

mod commands;

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

use crate::config::{default_root_dir, WalletConfig, DEFAULT_APP_NAME};
use crate::keyring::KeyringBackend;

pub use commands::execute;

/// Crypto Provider — pluggable signing providers with keyring-backed storage.
#[derive(Parser, Debug)]
#[command(name = "crypto-provider")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Keyring backend: memory, test, file or os.
    #[arg(long, global = true, default_value = "file")]
    pub backend: KeyringBackend,

    /// Data directory (defaults to the platform data dir).
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Application name, used to namespace OS keyring entries.
    #[arg(long, global = true, default_value = DEFAULT_APP_NAME)]
    pub app: String,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn wallet_config(&self) -> WalletConfig {
        WalletConfig::default()
            .with_backend(self.backend)
            .with_app_name(&self.app)
            .with_root_dir(self.home.clone().unwrap_or_else(default_root_dir))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered provider types.
    Factories,

    /// List stored providers.
    List,

    /// Create a provider and store its metadata.
    #[command(group(
        ArgGroup::new("source")
            .required(true)
            .args(["name", "json", "metadata"])
    ))]
    Register {
        /// Provider type (e.g. "file").
        #[arg(long = "type", default_value = "file")]
        provider_type: String,

        /// Create a fresh provider with this name.
        #[arg(long)]
        name: Option<String>,

        /// Build from a raw JSON file parsed by the factory.
        #[arg(long)]
        json: Option<PathBuf>,

        /// Build from a metadata JSON file.
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Show the stored metadata of a provider.
    Show {
        /// Provider name.
        uid: String,
    },

    /// Delete a stored provider.
    Delete {
        /// Provider name.
        uid: String,
    },

    /// Sign a message, printing the hex signature.
    Sign {
        /// Provider name.
        uid: String,

        #[arg(long)]
        message: String,
    },

    /// Verify a hex signature over a message.
    Verify {
        /// Provider name.
        uid: String,

        #[arg(long)]
        message: String,

        #[arg(long)]
        signature: String,
    },

    /// Print the address derived from a provider's public key.
    Address {
        /// Provider name.
        uid: String,
    },

    /// Find the provider owning an address.
    Find {
        address: String,
    },

    /// Build a provider from a `{"provider_type", "options"}` file and store it.
    Load {
        file: PathBuf,
    },
}

// ─── Tests ───────────────────────────────────────────────────────────────────
