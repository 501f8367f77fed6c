//! Audit log — SQLite-based operation history.
//!
//! Stores a record of every token operation (token-saved, token-read,
//! shop-removed, check, etc.) in a local SQLite database at
//! `<data_dir>/audit.db`. Only shop domains and operation names are
//! recorded — token values never reach this table.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::errors::{Result, ShopVaultError};

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub shop_domain: Option<String>,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database at `<data_dir>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened — callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(data_dir: &Path) -> Option<Self> {
        let db_path = data_dir.join("audit.db");
        let conn = Connection::open(&db_path).ok()?;

        // Set restrictive permissions on the audit database (owner-only).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                operation   TEXT NOT NULL,
                shop_domain TEXT,
                details     TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Fire-and-forget — errors are silently ignored.
    pub fn log(&self, operation: &str, shop_domain: Option<&str>, details: Option<&str>) {
        let now = Utc::now().to_rfc3339();
        let _ = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, shop_domain, details)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![now, operation, shop_domain, details],
        );
    }

    /// Query the most recent audit entries, newest first.
    pub fn query(&self, limit: usize) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, operation, shop_domain, details
                 FROM audit_log
                 ORDER BY id DESC
                 LIMIT ?1",
            )
            .map_err(|e| ShopVaultError::Audit(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map([limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    shop_domain: row.get(3)?,
                    details: row.get(4)?,
                })
            })
            .map_err(|e| ShopVaultError::Audit(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| ShopVaultError::Audit(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }

    /// Return the path to the audit database (for testing/display).
    pub fn db_path(data_dir: &Path) -> PathBuf {
        data_dir.join("audit.db")
    }
}

/// Convenience helper: log an audit event using the CLI context.
///
/// Resolves the data directory, respects the `audit_log` setting, and
/// silently ignores any errors. This is safe to call from any command —
/// it never fails the parent operation.
pub fn log_audit(cli: &crate::cli::Cli, op: &str, shop_domain: Option<&str>, details: Option<&str>) {
    let Ok(settings) = crate::cli::settings() else {
        return;
    };
    if !settings.audit_log {
        return;
    }
    let Ok(data_dir) = crate::cli::data_dir(cli, &settings) else {
        return;
    };

    if let Some(audit) = AuditLog::open(&data_dir) {
        audit.log(op, shop_domain, details);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_database() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path());
        assert!(audit.is_some(), "should open successfully");
        assert!(dir.path().join("audit.db").exists());
    }

    #[test]
    fn log_and_query_roundtrip() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("token-saved", Some("a.myshopify.com"), Some("installed"));
        audit.log("token-saved", Some("b.myshopify.com"), Some("refreshed"));
        audit.log("shop-removed", Some("a.myshopify.com"), None);

        let entries = audit.query(10).unwrap();
        assert_eq!(entries.len(), 3);

        // Most recent first.
        assert_eq!(entries[0].operation, "shop-removed");
        assert_eq!(entries[1].operation, "token-saved");
        assert_eq!(entries[2].operation, "token-saved");
    }

    #[test]
    fn query_with_limit() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        for i in 0..10 {
            audit.log("token-read", Some(&format!("shop{i}.myshopify.com")), None);
        }

        let entries = audit.query(3).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn log_records_shop_domain() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("check", None, Some("2 shops readable"));
        audit.log("token-read", Some("example.myshopify.com"), None);

        let entries = audit.query(2).unwrap();
        assert_eq!(entries[0].shop_domain.as_deref(), Some("example.myshopify.com"));
        assert!(entries[1].shop_domain.is_none());
        assert_eq!(entries[1].details.as_deref(), Some("2 shops readable"));
    }

    #[test]
    fn open_returns_none_on_bad_path() {
        // A path that doesn't exist as a directory should fail gracefully.
        let result = AuditLog::open(Path::new("/nonexistent/path/that/does/not/exist"));
        assert!(result.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn audit_db_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let _audit = AuditLog::open(dir.path()).unwrap();

        let db_path = dir.path().join("audit.db");
        let perms = std::fs::metadata(&db_path).unwrap().permissions();
        assert_eq!(
            perms.mode() & 0o777,
            0o600,
            "audit.db should have 0o600 permissions"
        );
    }
}
