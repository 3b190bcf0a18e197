//! Application layer errors

use std::path::PathBuf;
use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Sticker error: {0}")]
    Sticker(#[from] StickerError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} not found in environment variables. Check .env file.")]
    MissingField(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to load .env file: {0}")]
    Dotenv(String),

    #[error(transparent)]
    Credentials(#[from] CredentialError),
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Where a credential document came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialOrigin {
    EnvJson,
    File(PathBuf),
}

impl std::fmt::Display for CredentialOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialOrigin::EnvJson => write!(f, "FIREBASE_CRED_JSON"),
            CredentialOrigin::File(path) => write!(f, "file {}", path.display()),
        }
    }
}

/// Firebase credential resolution errors
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Firebase credentials missing: set FIREBASE_CRED_JSON or FIREBASE_CRED_PATH")]
    Missing,

    #[error("Firebase credentials missing: FIREBASE_CRED_PATH={} is not an existing file", .0.display())]
    FileNotFound(PathBuf),

    #[error("Firebase credentials unreadable at {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid Firebase credentials JSON from {origin}: {reason}")]
    InvalidJson { origin: CredentialOrigin, reason: String },

    #[error("Invalid Firebase service account from {origin}: {reason}")]
    InvalidServiceAccount { origin: CredentialOrigin, reason: String },
}

impl CredentialError {
    /// True when no credential source could be found at all
    pub fn is_missing(&self) -> bool {
        matches!(self, CredentialError::Missing | CredentialError::FileNotFound(_))
    }
}

/// Sticker pack errors
#[derive(Error, Debug)]
pub enum StickerError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Telegram API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Sticker set '{0}' is empty")]
    Empty(String),
}
