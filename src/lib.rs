// Crypto Provider — Library root
//
// Re-exports the component, factory, provider, keyring, wallet and CLI
// modules.

pub mod cli;
pub mod components;
pub mod config;
pub mod error;
pub mod factory;
pub mod keyring;
pub mod providers;
pub mod wallet;

mod secure_fs;

pub use config::WalletConfig;
pub use error::{Result, WalletError};
