//! `shopvault shops` — display all installed shops in a table.

use crate::cli::output;
use crate::cli::{open_existing_store, Cli};
use crate::errors::Result;

/// Execute the `shops` command.
///
/// Listing is metadata-only: no token is decrypted and no ciphertext is
/// shown.
pub fn execute(cli: &Cli) -> Result<()> {
    let store = open_existing_store(cli)?;

    let shops = store.list_shops()?;

    output::info(&format!("{} shop(s) installed", shops.len()));
    output::print_shops_table(&shops);

    Ok(())
}
