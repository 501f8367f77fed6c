//! Cryptographic primitives for ShopVault.
//!
//! This module provides:
//! - AES-256-GCM detached-tag encryption and decryption (`encryption`)
//! - Argon2id key derivation from the deployment secret (`kdf`)

pub mod encryption;
pub mod kdf;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_token_key, TokenKey};
pub use encryption::{decrypt, encrypt, IV_LEN, TAG_LEN};
pub use kdf::{derive_token_key, TokenKey};
