//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::{Settings, ENCRYPTION_SECRET_ENV};
use crate::errors::{Result, ShopVaultError};
use crate::shops::ShopStore;
use crate::vault::TokenVault;

/// ShopVault CLI: encrypted Shopify access token storage.
#[derive(Parser)]
#[command(
    name = "shopvault",
    about = "Encrypted Shopify access token vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (default: .shopvault, or data_dir from .shopvault.toml)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate a new high-entropy encryption secret
    Keygen,

    /// Store a shop's access token (add or refresh)
    Set {
        /// Shop domain (e.g. example.myshopify.com)
        shop: String,
        /// Access token (omit for interactive prompt)
        token: Option<String>,
        /// OAuth scopes granted to the app
        #[arg(long)]
        scope: Option<String>,
    },

    /// Decrypt and print a shop's access token
    Get {
        /// Shop domain
        shop: String,
    },

    /// List all installed shops
    Shops,

    /// Remove a shop's record (app uninstall)
    Delete {
        /// Shop domain
        shop: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Verify the deployment: secret present, every stored token readable
    Check,

    /// View the audit log of token operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the encryption secret, trying in order:
/// 1. `SHOPVAULT_ENCRYPTION_SECRET` env var (services, CI/CD)
/// 2. Interactive prompt (operators)
///
/// A missing secret in a non-interactive context is a configuration
/// error — the deployment cannot function, and no amount of retrying
/// will change that.
///
/// Returns `Zeroizing<String>` so the secret is wiped from memory on drop.
pub fn resolve_secret() -> Result<Zeroizing<String>> {
    if let Ok(secret) = std::env::var(ENCRYPTION_SECRET_ENV) {
        if !secret.is_empty() {
            return Ok(Zeroizing::new(secret));
        }
    }

    if !std::io::stdin().is_terminal() {
        return Err(ShopVaultError::Configuration(format!(
            "{ENCRYPTION_SECRET_ENV} is not set"
        )));
    }

    let secret = dialoguer::Password::new()
        .with_prompt("Enter encryption secret")
        .interact()
        .map_err(|e| ShopVaultError::CommandFailed(format!("secret prompt: {e}")))?;
    Ok(Zeroizing::new(secret))
}

/// Load settings from the current directory's `.shopvault.toml`.
pub fn settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Resolve the data directory: `--data-dir` wins over `.shopvault.toml`.
pub fn data_dir(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let dir = cli.data_dir.as_ref().unwrap_or(&settings.data_dir);
    Ok(cwd.join(dir))
}

/// Open the shop store, creating the data directory if needed.
///
/// Used by `set` — the first token write bootstraps the deployment.
pub fn open_store(cli: &Cli) -> Result<ShopStore> {
    let settings = settings()?;
    let dir = data_dir(cli, &settings)?;
    std::fs::create_dir_all(&dir)?;

    let secret = resolve_secret()?;
    let vault = TokenVault::new(&secret)?;
    ShopStore::open(dir.join(&settings.db_file), vault)
}

/// Open the shop store, requiring the database to already exist.
///
/// Used by read-side commands (`get`, `shops`, `check`, `delete`) so a
/// typo'd `--data-dir` fails loudly instead of silently creating an
/// empty database.
pub fn open_existing_store(cli: &Cli) -> Result<ShopStore> {
    let settings = settings()?;
    let dir = data_dir(cli, &settings)?;
    let db_path = dir.join(&settings.db_file);

    if !db_path.exists() {
        return Err(ShopVaultError::DataDirNotFound(dir));
    }

    let secret = resolve_secret()?;
    let vault = TokenVault::new(&secret)?;
    ShopStore::open(db_path, vault)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn data_dir_flag_overrides_settings() {
        let cli = Cli {
            command: Commands::Shops,
            data_dir: Some("custom-dir".to_string()),
        };
        let settings = Settings::default();

        let dir = data_dir(&cli, &settings).unwrap();
        assert!(dir.ends_with("custom-dir"));
    }

    #[test]
    fn data_dir_defaults_to_settings() {
        let cli = Cli {
            command: Commands::Shops,
            data_dir: None,
        };
        let settings = Settings::default();

        let dir = data_dir(&cli, &settings).unwrap();
        assert!(dir.ends_with(".shopvault"));
    }
}
