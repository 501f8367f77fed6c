//! `shopvault get` — decrypt and print a single shop's access token.

use crate::cli::{open_existing_store, Cli};
use crate::errors::Result;

/// Execute the `get` command.
pub fn execute(cli: &Cli, shop: &str) -> Result<()> {
    let store = open_existing_store(cli)?;

    // Decrypt and print the token to stdout.
    let token = store.access_token(shop)?;
    println!("{token}");

    crate::audit::log_audit(cli, "token-read", Some(shop), None);

    Ok(())
}
