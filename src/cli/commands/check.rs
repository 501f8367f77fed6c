//! `shopvault check` — deployment health check.
//!
//! Verifies, in order:
//! 1. the encryption secret is configured and a key can be derived;
//! 2. the shop database is present;
//! 3. every stored token blob decrypts under the configured secret.
//!
//! Exit is nonzero when any token is unreadable, so the command can back
//! a deployment health probe. An unreadable token is reported per shop
//! with its remediation (re-authenticate); a missing secret is reported
//! as a deployment misconfiguration.

use crate::cli::output;
use crate::cli::{open_existing_store, Cli};
use crate::errors::{Result, ShopVaultError};
use crate::shops::TokenHealth;

/// Execute the `check` command.
pub fn execute(cli: &Cli) -> Result<()> {
    // Opening the store exercises secret resolution and key derivation;
    // a Configuration error here means the deployment itself is broken.
    let store = open_existing_store(cli)?;

    let checks = store.verify_tokens()?;

    if checks.is_empty() {
        output::success("Deployment OK — no shops installed yet.");
        crate::audit::log_audit(cli, "check", None, Some("0 shops"));
        return Ok(());
    }

    let mut unreadable = 0usize;
    for check in &checks {
        match &check.health {
            TokenHealth::Readable => {}
            TokenHealth::Unauthenticated => {
                unreadable += 1;
                output::error(&format!(
                    "{} — token fails authentication (secret changed or data tampered); shop must re-authenticate",
                    check.shop_domain
                ));
            }
            TokenHealth::Malformed(reason) => {
                unreadable += 1;
                output::error(&format!(
                    "{} — stored token is malformed ({reason}); shop must re-authenticate",
                    check.shop_domain
                ));
            }
        }
    }

    let summary = format!("{}/{} shop tokens readable", checks.len() - unreadable, checks.len());
    crate::audit::log_audit(cli, "check", None, Some(&summary));

    if unreadable > 0 {
        return Err(ShopVaultError::CommandFailed(format!(
            "{unreadable} of {} shop token(s) are unreadable",
            checks.len()
        )));
    }

    output::success(&format!("Deployment OK — {summary}."));
    Ok(())
}
