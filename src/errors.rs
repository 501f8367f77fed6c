use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in ShopVault.
///
/// The three kinds callers must be able to tell apart are kept as
/// distinct variants:
/// - `Configuration` — the deployment has no usable encryption secret.
///   Fatal at process level; surface it at startup, do not retry.
/// - `MalformedCiphertext` — the stored blob is structurally broken
///   (corrupted or foreign data). Not retryable; re-authenticate the shop.
/// - `AuthenticationFailed` — the blob parses but the auth tag does not
///   verify (tampering or a key mismatch). Same remediation.
#[derive(Debug, Error)]
pub enum ShopVaultError {
    // --- Configuration errors ---
    #[error("Configuration error: {0}")]
    Configuration(String),

    // --- Crypto errors ---
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    #[error("Token authentication failed — wrong encryption secret or tampered data")]
    AuthenticationFailed,

    // --- Shop store errors ---
    #[error("No shop '{0}' is installed")]
    ShopNotFound(String),

    #[error("Invalid shop domain: {0}")]
    InvalidShopDomain(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // --- Config file errors ---
    #[error("Config file error: {0}")]
    ConfigFile(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Audit errors ---
    #[error("Audit error: {0}")]
    Audit(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Data directory not found at {0}")]
    DataDirNotFound(PathBuf),
}

/// Convenience type alias for ShopVault results.
pub type Result<T> = std::result::Result<T, ShopVaultError>;
