//! Token vault — encryption at rest for Shopify access tokens.
//!
//! This module provides:
//! - The stored `iv:tag:ciphertext` blob format (`blob`)
//! - The high-level `TokenVault` that turns plaintext tokens into blobs
//!   and back
//!
//! A `TokenVault` is constructed once with the deployment's encryption
//! secret and handed to whoever persists tokens — the secret is never read
//! from the process environment inside this module. Key derivation runs in
//! the constructor; after that both operations are pure functions over an
//! immutable key and are safe to call from any number of threads.

pub mod blob;

pub use blob::CiphertextBlob;

use zeroize::Zeroize;

use crate::crypto::{self, TokenKey};
use crate::errors::{Result, ShopVaultError};

/// Encrypts tokens for storage and decrypts them on read.
///
/// Holds the Argon2id-derived AES key (zeroized on drop). Encryption
/// generates a fresh IV per call, so encrypting the same token twice never
/// yields the same blob.
pub struct TokenVault {
    key: TokenKey,
}

impl TokenVault {
    /// Build a vault from the deployment's encryption secret.
    ///
    /// Derives the AES key immediately: a missing or empty secret fails
    /// here, before any token is touched, rather than on first use deep
    /// inside a request.
    pub fn new(secret: &str) -> Result<Self> {
        let key = crypto::derive_token_key(secret)?;
        Ok(Self { key })
    }

    /// Encrypt a plaintext access token into a storable blob string.
    ///
    /// The token must be non-empty. The returned string is
    /// `iv:tag:ciphertext`, each segment hex-encoded.
    pub fn encrypt(&self, token: &str) -> Result<String> {
        if token.is_empty() {
            return Err(ShopVaultError::Encryption(
                "refusing to encrypt an empty token".into(),
            ));
        }

        let (iv, tag, ciphertext) = crypto::encrypt(self.key.as_bytes(), token.as_bytes())?;
        Ok(CiphertextBlob::new(iv, tag, ciphertext).to_string())
    }

    /// Decrypt a blob string back into the plaintext token.
    ///
    /// Structural problems (wrong segment count, bad hex, wrong IV/tag
    /// length) are `MalformedCiphertext`; a blob that parses but fails tag
    /// verification is `AuthenticationFailed`. Neither ever yields partial
    /// or altered plaintext.
    pub fn decrypt(&self, blob: &str) -> Result<String> {
        let parsed: CiphertextBlob = blob.parse()?;

        let plaintext_bytes =
            crypto::decrypt(self.key.as_bytes(), &parsed.iv, &parsed.tag, &parsed.ciphertext)?;

        // The tag verified, so these are the bytes we once encrypted — but
        // foreign writers could store non-UTF-8 under the right key. Wipe
        // the bytes inside the error before discarding.
        String::from_utf8(plaintext_bytes).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            ShopVaultError::MalformedCiphertext("decrypted token is not valid UTF-8".into())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn vault() -> TokenVault {
        TokenVault::new("test-deployment-secret").unwrap()
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let vault = vault();

        for token in [
            "shpat_abc123def456",
            "x",
            "a much longer credential string with spaces and = signs ==",
            "ünïcödé-tøken-🔑",
        ] {
            let blob = vault.encrypt(token).unwrap();
            assert_ne!(blob, token);
            assert_eq!(vault.decrypt(&blob).unwrap(), token);
        }
    }

    #[test]
    fn blob_has_expected_shape() {
        let vault = vault();
        let blob = vault.encrypt("shpat_abc123").unwrap();

        let segments: Vec<&str> = blob.split(':').collect();
        assert_eq!(segments.len(), 3);
        // 16-byte IV and 16-byte tag, hex-encoded.
        assert_eq!(segments[0].len(), 32);
        assert_eq!(segments[1].len(), 32);
        assert!(!segments[2].is_empty());
        assert!(segments.iter().all(|s| s.chars().all(|c| c.is_ascii_hexdigit())));
    }

    #[test]
    fn iv_is_unique_across_repeated_encryptions() {
        let vault = vault();

        let mut ivs = HashSet::new();
        let mut blobs = HashSet::new();
        for _ in 0..100 {
            let blob = vault.encrypt("same-token-every-time").unwrap();
            let iv = blob.split(':').next().unwrap().to_string();
            ivs.insert(iv);
            blobs.insert(blob);
        }

        assert_eq!(ivs.len(), 100, "every encryption must use a fresh IV");
        assert_eq!(blobs.len(), 100);
    }

    #[test]
    fn flipping_any_hex_character_is_detected() {
        let vault = vault();
        let blob = vault.encrypt("shpat_tamper_check").unwrap();

        for (i, c) in blob.char_indices() {
            if c == ':' {
                continue;
            }
            let flipped = if c == '0' { '1' } else { '0' };
            let mut tampered = blob.clone();
            tampered.replace_range(i..=i, &flipped.to_string());
            if tampered == blob {
                continue;
            }

            match vault.decrypt(&tampered) {
                Err(ShopVaultError::AuthenticationFailed)
                | Err(ShopVaultError::MalformedCiphertext(_)) => {}
                Ok(_) => panic!("tampered blob at position {i} decrypted successfully"),
                Err(other) => panic!("unexpected error for position {i}: {other}"),
            }
        }
    }

    #[test]
    fn wrong_secret_fails_authentication() {
        let vault_a = TokenVault::new("secret-one").unwrap();
        let vault_b = TokenVault::new("secret-two").unwrap();

        let blob = vault_a.encrypt("shpat_abc123").unwrap();
        let result = vault_b.decrypt(&blob);
        assert!(matches!(result, Err(ShopVaultError::AuthenticationFailed)));
    }

    #[test]
    fn malformed_blobs_are_rejected_before_the_cipher_runs() {
        let vault = vault();

        for blob in [
            "",
            "deadbeef",
            "aa:bb",
            "aa:bb:cc:dd",
            "not hex at all:also not:nope",
        ] {
            let result = vault.decrypt(blob);
            assert!(
                matches!(result, Err(ShopVaultError::MalformedCiphertext(_))),
                "blob {blob:?} should be malformed"
            );
        }
    }

    #[test]
    fn empty_token_is_rejected() {
        let result = vault().encrypt("");
        assert!(matches!(result, Err(ShopVaultError::Encryption(_))));
    }

    #[test]
    fn missing_secret_fails_before_any_cipher_work() {
        let result = TokenVault::new("");
        assert!(matches!(result, Err(ShopVaultError::Configuration(_))));
    }

    #[test]
    fn error_messages_never_contain_the_plaintext() {
        let vault = vault();
        let token = "shpat_super_secret_value";
        let blob = vault.encrypt(token).unwrap();

        // Corrupt the tag segment so decryption fails.
        let mut segments: Vec<String> = blob.split(':').map(String::from).collect();
        segments[1] = "00".repeat(16);
        let tampered = segments.join(":");

        let err = vault.decrypt(&tampered).unwrap_err();
        assert!(!err.to_string().contains(token));
    }
}
