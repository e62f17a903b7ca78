//! Error types for the admin CLI.

use std::error::Error as StdError;
use std::fmt;

/// Errors that can occur in the admin CLI.
#[derive(Debug)]
pub enum CliError {
    /// Error when a file operation fails.
    FileError(std::io::Error),

    /// Error when JSON serialization or deserialization fails.
    JsonError(serde_json::Error),

    /// Error when opening or reading the backing store fails.
    StoreError(String),

    /// Error surfaced by the vault itself.
    VaultError(vault::VaultError),

    /// Error when an address is invalid.
    InvalidAddress(String),

    /// Error when a required caller identity is missing.
    MissingCaller(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileError(e) => write!(f, "File error: {}", e),
            CliError::JsonError(e) => write!(f, "JSON error: {}", e),
            CliError::StoreError(msg) => write!(f, "Store error: {}", msg),
            CliError::VaultError(e) => write!(f, "Vault error: {}", e),
            CliError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            CliError::MissingCaller(msg) => write!(f, "Missing caller: {}", msg),
        }
    }
}

impl StdError for CliError {}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::FileError(error)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        CliError::JsonError(error)
    }
}

impl From<vault::VaultError> for CliError {
    fn from(error: vault::VaultError) -> Self {
        CliError::VaultError(error)
    }
}

impl From<rocksdb::Error> for CliError {
    fn from(error: rocksdb::Error) -> Self {
        CliError::StoreError(error.to_string())
    }
}
