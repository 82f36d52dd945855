// Crypto Provider — File Provider
//
// Ed25519 signing with the private key kept in a JSON file on local disk.

mod config;
mod factory;
mod keys;
mod provider;
mod signer;

pub use config::{FileProviderConfig, CONFIG_FILEPATH};
pub use factory::FileProviderFactory;
pub use keys::{FilePubKey, KEY_TYPE_ED25519};
pub use provider::FileProvider;
pub use signer::{FileHasher, FileSigner, FileVerifier};

pub const PROVIDER_TYPE_FILE: &str = "file";

pub const VERSION: &str = "v1.0.0";
