//! Stored ciphertext blob format.
//!
//! A token is persisted as a single text column with this layout:
//!
//! ```text
//! <iv hex (32 chars)>:<auth tag hex (32 chars)>:<ciphertext hex>
//! ```
//!
//! - **IV**: the random 16-byte initialization vector used for this record.
//! - **Auth tag**: the 16-byte GCM authentication tag.
//! - **Ciphertext**: the encrypted token bytes.
//!
//! Parsing is strict: exactly three non-empty segments, valid hex in each,
//! and exact IV/tag lengths. Anything else is `MalformedCiphertext` —
//! structurally broken data is reported as such, never fed to the cipher to
//! surface as a confusing authentication failure.

use std::fmt;
use std::str::FromStr;

use crate::crypto::{IV_LEN, TAG_LEN};
use crate::errors::{Result, ShopVaultError};

/// Delimiter between the blob's three segments.
const SEPARATOR: char = ':';

/// A parsed ciphertext blob: IV, auth tag, and encrypted payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiphertextBlob {
    pub iv: [u8; IV_LEN],
    pub tag: [u8; TAG_LEN],
    pub ciphertext: Vec<u8>,
}

impl CiphertextBlob {
    /// Assemble a blob from the cipher's outputs.
    pub fn new(iv: [u8; IV_LEN], tag: [u8; TAG_LEN], ciphertext: Vec<u8>) -> Self {
        Self { iv, tag, ciphertext }
    }
}

impl fmt::Display for CiphertextBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            hex::encode(self.iv),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext)
        )
    }
}

impl FromStr for CiphertextBlob {
    type Err = ShopVaultError;

    fn from_str(blob: &str) -> Result<Self> {
        let segments: Vec<&str> = blob.split(SEPARATOR).collect();

        if segments.len() != 3 {
            return Err(ShopVaultError::MalformedCiphertext(format!(
                "expected 3 colon-delimited segments, got {}",
                segments.len()
            )));
        }
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ShopVaultError::MalformedCiphertext(
                "empty segment in ciphertext blob".into(),
            ));
        }

        let iv_bytes = decode_segment(segments[0], "iv")?;
        let tag_bytes = decode_segment(segments[1], "auth tag")?;
        let ciphertext = decode_segment(segments[2], "ciphertext")?;

        let iv: [u8; IV_LEN] = iv_bytes.try_into().map_err(|_| {
            ShopVaultError::MalformedCiphertext(format!("iv must be {IV_LEN} bytes"))
        })?;
        let tag: [u8; TAG_LEN] = tag_bytes.try_into().map_err(|_| {
            ShopVaultError::MalformedCiphertext(format!("auth tag must be {TAG_LEN} bytes"))
        })?;

        Ok(Self { iv, tag, ciphertext })
    }
}

/// Hex-decode one segment, naming it in the error on failure.
fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>> {
    hex::decode(segment)
        .map_err(|_| ShopVaultError::MalformedCiphertext(format!("{name} segment is not valid hex")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_blob() -> CiphertextBlob {
        CiphertextBlob::new([0xAA; IV_LEN], [0xBB; TAG_LEN], vec![0x01, 0x02, 0x03])
    }

    #[test]
    fn render_parse_roundtrip() {
        let blob = sample_blob();
        let rendered = blob.to_string();

        let parsed: CiphertextBlob = rendered.parse().unwrap();
        assert_eq!(parsed, blob);
    }

    #[test]
    fn rendered_shape_is_three_hex_segments() {
        let rendered = sample_blob().to_string();
        let segments: Vec<&str> = rendered.split(':').collect();

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].len(), IV_LEN * 2);
        assert_eq!(segments[1].len(), TAG_LEN * 2);
        assert!(segments.iter().all(|s| s.chars().all(|c| c.is_ascii_hexdigit())));
    }

    #[test]
    fn rejects_wrong_segment_count() {
        for blob in ["", "aabb", "aa:bb", "aa:bb:cc:dd"] {
            let result = blob.parse::<CiphertextBlob>();
            assert!(
                matches!(result, Err(ShopVaultError::MalformedCiphertext(_))),
                "blob {blob:?} should be malformed"
            );
        }
    }

    #[test]
    fn rejects_empty_segments() {
        for blob in [":aa:bb", "aa::bb", "aa:bb:"] {
            let result = blob.parse::<CiphertextBlob>();
            assert!(matches!(result, Err(ShopVaultError::MalformedCiphertext(_))));
        }
    }

    #[test]
    fn rejects_non_hex_segments() {
        let iv = "aa".repeat(IV_LEN);
        let tag = "bb".repeat(TAG_LEN);

        for blob in [
            format!("zz{iv}:{tag}:cc"),
            format!("{iv}:not-hex!:cc"),
            format!("{iv}:{tag}:c_c"),
        ] {
            let result = blob.parse::<CiphertextBlob>();
            assert!(matches!(result, Err(ShopVaultError::MalformedCiphertext(_))));
        }
    }

    #[test]
    fn rejects_wrong_iv_length() {
        // 8-byte IV instead of 16.
        let blob = format!("{}:{}:{}", "aa".repeat(8), "bb".repeat(TAG_LEN), "cc");
        let result = blob.parse::<CiphertextBlob>();
        assert!(matches!(result, Err(ShopVaultError::MalformedCiphertext(_))));
    }

    #[test]
    fn rejects_wrong_tag_length() {
        // 12-byte tag instead of 16.
        let blob = format!("{}:{}:{}", "aa".repeat(IV_LEN), "bb".repeat(12), "cc");
        let result = blob.parse::<CiphertextBlob>();
        assert!(matches!(result, Err(ShopVaultError::MalformedCiphertext(_))));
    }

    #[test]
    fn hex_is_lowercase_but_parse_accepts_uppercase() {
        let rendered = sample_blob().to_string();
        assert_eq!(rendered, rendered.to_lowercase());

        let parsed: CiphertextBlob = rendered.to_uppercase().parse().unwrap();
        assert_eq!(parsed, sample_blob());
    }
}
