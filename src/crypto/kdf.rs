//! Key derivation for the token vault using Argon2id.
//!
//! The 32-byte AES key is derived from the deployment's encryption secret
//! with Argon2id, a memory-hard KDF. The salt is a fixed application-level
//! constant: it namespaces this application's derivation so the same secret
//! used elsewhere yields a different key. It is not secret and not per-call.
//!
//! The cost parameters are constants, not configuration. Changing any of
//! them (or the salt) changes the derived key and makes every previously
//! stored blob undecryptable.

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroize;

use crate::errors::{Result, ShopVaultError};

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Fixed application salt. Shared by every deployment — see DESIGN.md.
const KDF_SALT: &[u8] = b"shopvault/access-token/kdf/v1";

/// Argon2id memory cost in KiB (64 MB).
const MEMORY_KIB: u32 = 65_536;

/// Argon2id iteration count.
const ITERATIONS: u32 = 3;

/// Argon2id parallelism lanes.
const PARALLELISM: u32 = 4;

/// A 32-byte derived token key that zeroes its memory when dropped.
///
/// Derived once per `TokenVault` and immutable afterwards, so it can be
/// shared across threads without coordination.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct TokenKey {
    bytes: [u8; KEY_LEN],
}

impl TokenKey {
    /// Access the raw key bytes (to hand to the cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// Derive the 32-byte token key from the deployment's encryption secret.
///
/// Deterministic: the same secret always yields the same key, so blobs
/// written by one process are readable by the next. An empty secret is a
/// configuration error and is rejected before any derivation work.
pub fn derive_token_key(secret: &str) -> Result<TokenKey> {
    if secret.is_empty() {
        return Err(ShopVaultError::Configuration(
            "encryption secret is empty — set SHOPVAULT_ENCRYPTION_SECRET".into(),
        ));
    }

    let params = Params::new(MEMORY_KIB, ITERATIONS, PARALLELISM, Some(KEY_LEN))
        .map_err(|e| ShopVaultError::KeyDerivation(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(secret.as_bytes(), KDF_SALT, &mut key)
        .map_err(|e| ShopVaultError::KeyDerivation(format!("Argon2id hashing failed: {e}")))?;

    let token_key = TokenKey { bytes: key };
    key.zeroize();
    Ok(token_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_secret_derives_same_key() {
        let k1 = derive_token_key("deployment-secret").unwrap();
        let k2 = derive_token_key("deployment-secret").unwrap();
        assert_eq!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn different_secrets_derive_different_keys() {
        let k1 = derive_token_key("secret-one").unwrap();
        let k2 = derive_token_key("secret-two").unwrap();
        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn derived_key_is_32_bytes() {
        let key = derive_token_key("deployment-secret").unwrap();
        assert_eq!(key.as_bytes().len(), KEY_LEN);
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        let result = derive_token_key("");
        assert!(matches!(result, Err(ShopVaultError::Configuration(_))));
    }
}
