//! Encrypted shop token storage backed by SQLite.
//!
//! One row per installed shop; the `access_token` column holds the
//! `iv:tag:ciphertext` blob produced by the vault, never a plaintext
//! token. Every write re-encrypts (fresh IV), every read decrypts
//! transiently, and every decrypt failure propagates to the caller —
//! a shop with an unreadable token must surface as such, not as an
//! empty credential that fails confusingly downstream.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::record::{ShopMetadata, TokenCheck, TokenHealth};
use crate::errors::{Result, ShopVaultError};
use crate::vault::TokenVault;

/// Upper bound on shop domain length (DNS limit).
const MAX_DOMAIN_LEN: usize = 255;

/// Encrypted shop token store.
///
/// Construction takes the vault explicitly — the store never reads key
/// material from the environment itself. The SQLite connection is wrapped
/// in a `Mutex` for safe concurrent access.
pub struct ShopStore {
    conn: Mutex<Connection>,
    vault: TokenVault,
}

impl ShopStore {
    /// Open (or create) the shop database at `db_path`.
    ///
    /// Pass `":memory:"` for an ephemeral store in tests.
    pub fn open<P: AsRef<Path>>(db_path: P, vault: TokenVault) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS shops (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                shop_domain  TEXT NOT NULL UNIQUE,
                access_token TEXT NOT NULL,
                scope        TEXT,
                installed_at TEXT NOT NULL,
                updated_at   TEXT NOT NULL
            );",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            vault,
        })
    }

    /// Persist a shop's access token, encrypting it first.
    ///
    /// Called when an OAuth flow completes (first install) and again on
    /// every token refresh. Upsert semantics: a refresh overwrites the
    /// blob with a freshly encrypted one and bumps `updated_at`, while
    /// `installed_at` keeps the original install time.
    pub fn save_token(&self, shop_domain: &str, token: &str, scope: Option<&str>) -> Result<()> {
        validate_shop_domain(shop_domain)?;

        let blob = self.vault.encrypt(token)?;
        let now = Utc::now().to_rfc3339();

        self.conn.lock().unwrap().execute(
            "INSERT INTO shops (shop_domain, access_token, scope, installed_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(shop_domain) DO UPDATE SET
                 access_token = excluded.access_token,
                 scope = excluded.scope,
                 updated_at = excluded.updated_at",
            params![shop_domain, blob, scope, now],
        )?;

        Ok(())
    }

    /// Decrypt and return a shop's access token.
    ///
    /// The plaintext lives only in the returned `String`; nothing is
    /// cached. Fails with `ShopNotFound` for unknown shops and propagates
    /// `MalformedCiphertext`/`AuthenticationFailed` from the vault.
    pub fn access_token(&self, shop_domain: &str) -> Result<String> {
        validate_shop_domain(shop_domain)?;

        let blob = self.ciphertext_blob(shop_domain)?;
        self.vault.decrypt(&blob)
    }

    /// Returns `true` if a row exists for this shop.
    ///
    /// Metadata-only check — no decryption is performed.
    pub fn is_installed(&self, shop_domain: &str) -> Result<bool> {
        validate_shop_domain(shop_domain)?;

        let exists: bool = self.conn.lock().unwrap().query_row(
            "SELECT EXISTS(SELECT 1 FROM shops WHERE shop_domain = ?1)",
            params![shop_domain],
            |row| row.get(0),
        )?;

        Ok(exists)
    }

    /// Remove a shop's record (app uninstall).
    ///
    /// Returns `true` if a row was deleted, `false` if the shop was not
    /// installed.
    pub fn remove_shop(&self, shop_domain: &str) -> Result<bool> {
        validate_shop_domain(shop_domain)?;

        let rows = self.conn.lock().unwrap().execute(
            "DELETE FROM shops WHERE shop_domain = ?1",
            params![shop_domain],
        )?;

        Ok(rows > 0)
    }

    /// List metadata for all installed shops, sorted by domain.
    ///
    /// Metadata only — no ciphertext leaves the database and nothing is
    /// decrypted.
    pub fn list_shops(&self) -> Result<Vec<ShopMetadata>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT shop_domain, scope, installed_at, updated_at
             FROM shops
             ORDER BY shop_domain",
        )?;

        let shops = stmt
            .query_map([], |row| {
                Ok(ShopMetadata {
                    shop_domain: row.get(0)?,
                    scope: row.get(1)?,
                    installed_at: parse_timestamp(&row.get::<_, String>(2)?),
                    updated_at: parse_timestamp(&row.get::<_, String>(3)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(shops)
    }

    /// Returns the number of installed shops.
    pub fn shop_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM shops", [], |row| row.get(0))?;

        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Attempt to decrypt every stored blob and report per-shop health.
    ///
    /// Used by the `check` command: a deployment whose secret changed (or
    /// whose rows were corrupted) learns exactly which shops need to
    /// re-authenticate. Plaintext from successful decryptions is dropped
    /// immediately.
    pub fn verify_tokens(&self) -> Result<Vec<TokenCheck>> {
        let blobs: Vec<(String, String)> = {
            let conn = self.conn.lock().unwrap();
            let mut stmt = conn
                .prepare("SELECT shop_domain, access_token FROM shops ORDER BY shop_domain")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        };

        let mut checks = Vec::with_capacity(blobs.len());
        for (shop_domain, blob) in blobs {
            let health = match self.vault.decrypt(&blob) {
                Ok(_) => TokenHealth::Readable,
                Err(ShopVaultError::AuthenticationFailed) => TokenHealth::Unauthenticated,
                Err(ShopVaultError::MalformedCiphertext(reason)) => TokenHealth::Malformed(reason),
                Err(other) => return Err(other),
            };
            checks.push(TokenCheck {
                shop_domain,
                health,
            });
        }

        Ok(checks)
    }

    /// Fetch the raw ciphertext blob for one shop.
    fn ciphertext_blob(&self, shop_domain: &str) -> Result<String> {
        let blob: Option<String> = self
            .conn
            .lock()
            .unwrap()
            .query_row(
                "SELECT access_token FROM shops WHERE shop_domain = ?1",
                params![shop_domain],
                |row| row.get(0),
            )
            .optional()?;

        blob.ok_or_else(|| ShopVaultError::ShopNotFound(shop_domain.to_string()))
    }
}

/// Parse an RFC 3339 timestamp column, falling back to now on bad data.
fn parse_timestamp(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}

/// Validate that a shop domain is safe and sensible.
///
/// Allowed: lowercase letters, digits, hyphens, dots. Must be non-empty,
/// at most 255 characters, and must not start or end with a hyphen or dot.
/// This catches typos before they silently create a second row for the
/// same shop.
pub fn validate_shop_domain(shop_domain: &str) -> Result<()> {
    if shop_domain.is_empty() {
        return Err(ShopVaultError::InvalidShopDomain(
            "shop domain cannot be empty".into(),
        ));
    }

    if shop_domain.len() > MAX_DOMAIN_LEN {
        return Err(ShopVaultError::InvalidShopDomain(format!(
            "shop domain cannot exceed {MAX_DOMAIN_LEN} characters"
        )));
    }

    if !shop_domain
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(ShopVaultError::InvalidShopDomain(format!(
            "'{shop_domain}' contains invalid characters — only lowercase letters, digits, hyphens, and dots are allowed"
        )));
    }

    let edge_chars = |c: char| c == '-' || c == '.';
    if shop_domain.starts_with(edge_chars) || shop_domain.ends_with(edge_chars) {
        return Err(ShopVaultError::InvalidShopDomain(format!(
            "'{shop_domain}' cannot start or end with a hyphen or dot"
        )));
    }

    Ok(())
}
