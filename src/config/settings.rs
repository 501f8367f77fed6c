use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ShopVaultError};

/// Name of the environment variable holding the deployment's encryption
/// secret. Expected to be high-entropy — e.g. the output of
/// `shopvault keygen` (32 random bytes, hex-encoded). Rotating it without
/// re-encrypting invalidates every stored token.
pub const ENCRYPTION_SECRET_ENV: &str = "SHOPVAULT_ENCRYPTION_SECRET";

/// Deployment-level configuration, loaded from `.shopvault.toml`.
///
/// Every field has a sensible default so ShopVault works out-of-the-box
/// without any config file at all. The encryption secret itself is never
/// read from this file — it comes from the environment only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the deployment root) holding the shop
    /// database and audit log.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Filename of the shop database inside `data_dir`.
    #[serde(default = "default_db_file")]
    pub db_file: String,

    /// Whether to record operations in the audit log.
    #[serde(default = "default_audit_log")]
    pub audit_log: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_data_dir() -> String {
    ".shopvault".to_string()
}

fn default_db_file() -> String {
    "shops.db".to_string()
}

fn default_audit_log() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            db_file: default_db_file(),
            audit_log: default_audit_log(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the deployment root.
    const FILE_NAME: &'static str = ".shopvault.toml";

    /// Load settings from `<project_dir>/.shopvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            ShopVaultError::ConfigFile(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Build the full path to the shop database.
    ///
    /// Example: `project_dir/.shopvault/shops.db`
    pub fn db_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.data_dir).join(&self.db_file)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.data_dir, ".shopvault");
        assert_eq!(s.db_file, "shops.db");
        assert!(s.audit_log);
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.data_dir, ".shopvault");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
data_dir = "var/vault"
db_file = "tokens.db"
audit_log = false
"#;
        fs::write(tmp.path().join(".shopvault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.data_dir, "var/vault");
        assert_eq!(settings.db_file, "tokens.db");
        assert!(!settings.audit_log);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let config = "data_dir = \"var/vault\"\n";
        fs::write(tmp.path().join(".shopvault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.data_dir, "var/vault");
        // Rest should be defaults
        assert_eq!(settings.db_file, "shops.db");
        assert!(settings.audit_log);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".shopvault.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(result.is_err());
    }

    #[test]
    fn db_path_builds_correct_path() {
        let s = Settings::default();
        let project = Path::new("/srv/fulfillment");
        assert_eq!(
            s.db_path(project),
            PathBuf::from("/srv/fulfillment/.shopvault/shops.db")
        );
    }
}
