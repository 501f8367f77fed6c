//! `shopvault delete` — remove a shop's record.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_existing_store, Cli};
use crate::errors::{Result, ShopVaultError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, shop: &str, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove shop '{shop}' and its stored token?"))
            .default(false)
            .interact()
            .map_err(|e| ShopVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let store = open_existing_store(cli)?;

    if !store.remove_shop(shop)? {
        return Err(ShopVaultError::ShopNotFound(shop.to_string()));
    }

    crate::audit::log_audit(cli, "shop-removed", Some(shop), None);
    output::success(&format!("Removed shop '{shop}'"));

    Ok(())
}
