//! AES-256-GCM authenticated encryption with a detached tag.
//!
//! The stored record keeps IV, auth tag, and ciphertext as separate
//! segments, so encryption here uses the detached-tag API rather than the
//! usual tag-appended buffer. The record format fixes a 16-byte IV, hence
//! the non-default nonce size on the cipher type.
//!
//! `decrypt` verifies the tag before producing a single plaintext byte; on
//! verification failure the buffer still holds ciphertext.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{AeadCore, AeadInPlace, KeyInit, OsRng};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;

use crate::errors::{Result, ShopVaultError};

/// AES-256-GCM with a 16-byte nonce, matching the stored record layout.
type TokenCipher = AesGcm<Aes256, U16>;

/// Size of the initialization vector in bytes.
pub const IV_LEN: usize = 16;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` with a 32-byte `key` and a fresh random IV.
///
/// Returns `(iv, tag, ciphertext)` as separate buffers.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<([u8; IV_LEN], [u8; TAG_LEN], Vec<u8>)> {
    let cipher = TokenCipher::new_from_slice(key)
        .map_err(|e| ShopVaultError::Encryption(format!("invalid key length: {e}")))?;

    // Fresh random 16-byte IV on every call — never reused, never derived.
    let nonce = TokenCipher::generate_nonce(&mut OsRng);

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(&nonce, b"", &mut buffer)
        .map_err(|_| ShopVaultError::Encryption("cipher error".into()))?;

    Ok((nonce.into(), tag.into(), buffer))
}

/// Decrypt a `(iv, tag, ciphertext)` triple produced by [`encrypt`].
///
/// Fails with `AuthenticationFailed` when the tag does not verify (wrong
/// key, tampered data, or corruption). No partial plaintext is returned.
pub fn decrypt(key: &[u8], iv: &[u8; IV_LEN], tag: &[u8; TAG_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let cipher = TokenCipher::new_from_slice(key)
        .map_err(|_| ShopVaultError::AuthenticationFailed)?;

    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(iv.into(), b"", &mut buffer, tag.into())
        .map_err(|_| ShopVaultError::AuthenticationFailed)?;

    Ok(buffer)
}
