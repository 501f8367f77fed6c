//! `shopvault set` — store or refresh a shop's access token.

use std::io::{self, IsTerminal, Read};

use crate::cli::output;
use crate::cli::{open_store, Cli};
use crate::errors::Result;

/// Execute the `set` command.
pub fn execute(cli: &Cli, shop: &str, token: Option<&str>, scope: Option<&str>) -> Result<()> {
    // Determine the token value from one of three sources.
    let token_value = if let Some(t) = token {
        // Source 1: Inline value on the command line.
        output::warning("Token provided on command line — it may appear in shell history.");
        t.to_string()
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf.trim_end().to_string()
    } else {
        // Source 3: Interactive secure prompt (default).
        dialoguer::Password::new()
            .with_prompt(format!("Enter access token for {shop}"))
            .interact()
            .map_err(|e| {
                crate::errors::ShopVaultError::CommandFailed(format!("input prompt: {e}"))
            })?
    };

    let store = open_store(cli)?;

    let existed = store.is_installed(shop)?;
    store.save_token(shop, &token_value, scope)?;

    let op_detail = if existed { "refreshed" } else { "installed" };
    crate::audit::log_audit(cli, "token-saved", Some(shop), Some(op_detail));

    if existed {
        output::success(&format!(
            "Token for '{}' refreshed ({} shop(s) installed)",
            shop,
            store.shop_count()?
        ));
    } else {
        output::success(&format!(
            "Token for '{}' stored ({} shop(s) installed)",
            shop,
            store.shop_count()?
        ));
    }

    Ok(())
}
