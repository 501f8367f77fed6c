//! Shop record types.
//!
//! `ShopMetadata` is a `shops` table row without its ciphertext, for
//! listings that must not touch any encrypted material. `TokenCheck` is
//! the per-shop outcome of a health sweep.

use chrono::{DateTime, Utc};

/// Lightweight metadata about a shop (no encrypted value).
///
/// Returned by `ShopStore::list_shops` so callers can display shop domains
/// and timestamps without touching any ciphertext.
#[derive(Debug, Clone)]
pub struct ShopMetadata {
    pub shop_domain: String,
    pub scope: Option<String>,
    pub installed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a health sweep over one shop's stored token.
#[derive(Debug, Clone)]
pub enum TokenHealth {
    /// The blob decrypted cleanly.
    Readable,
    /// The blob is structurally broken (corrupted or foreign data).
    Malformed(String),
    /// The blob parses but fails tag verification — wrong deployment
    /// secret or tampered data. The shop needs to re-authenticate.
    Unauthenticated,
}

/// One entry of a `verify_tokens` sweep.
#[derive(Debug, Clone)]
pub struct TokenCheck {
    pub shop_domain: String,
    pub health: TokenHealth,
}

impl TokenCheck {
    /// Returns `true` when the stored token decrypted cleanly.
    pub fn is_readable(&self) -> bool {
        matches!(self.health, TokenHealth::Readable)
    }
}
