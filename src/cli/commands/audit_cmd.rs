//! `shopvault audit` — view the operation history.

use crate::audit::AuditLog;
use crate::cli::output;
use crate::cli::{data_dir, settings, Cli};
use crate::errors::{Result, ShopVaultError};

/// Execute the `audit` command.
///
/// Reads only the audit database — no encryption secret is needed.
pub fn execute(cli: &Cli, last: usize) -> Result<()> {
    let settings = settings()?;
    let dir = data_dir(cli, &settings)?;

    let audit = AuditLog::open(&dir)
        .ok_or_else(|| ShopVaultError::Audit(format!("cannot open audit log in {}", dir.display())))?;

    let entries = audit.query(last)?;

    if entries.is_empty() {
        output::info("No audit entries yet.");
        return Ok(());
    }

    for entry in &entries {
        let shop = entry.shop_domain.as_deref().unwrap_or("-");
        let details = entry.details.as_deref().unwrap_or("");
        println!(
            "{}  {:<13} {:<40} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.operation,
            shop,
            details
        );
    }

    Ok(())
}
