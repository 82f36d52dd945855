// Crypto Provider — Keyring error types

use thiserror::Error;

use super::prompt::Passphrase;

pub type KeyringResult<T> = std::result::Result<T, KeyringError>;

#[derive(Debug, Error)]
pub enum KeyringError {
    #[error("invalid keyring backend: {0}. Valid options: memory, test, file, os")]
    InvalidBackend(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("too many failed passphrase attempts")]
    TooManyAttempts,

    /// Carries what was typed so the caller can decide how to handle it.
    #[error("passphrase must be at least {min} characters")]
    PassphraseTooShort { min: usize, entered: Passphrase },

    #[error("passphrases do not match")]
    PassphraseMismatch,

    #[error("incorrect passphrase")]
    IncorrectPassphrase,

    #[error("no passphrase input available")]
    InputExhausted,

    #[error("passphrase hash error: {0}")]
    Hash(String),

    #[error("record format error: {0}")]
    Format(String),

    #[error("OS keyring error: {0}")]
    Os(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
