//! `shopvault keygen` — generate a new encryption secret.

use rand::RngCore;

use crate::cli::output;
use crate::errors::Result;

/// Length of a generated encryption secret in bytes (256 bits).
const SECRET_LEN: usize = 32;

/// Execute the `keygen` command.
///
/// Prints 32 bytes of OS randomness, hex-encoded, to stdout. The operator
/// sets the value as `SHOPVAULT_ENCRYPTION_SECRET` for the deployment.
/// Nothing is written to disk — losing the secret means losing every
/// stored token.
pub fn execute() -> Result<()> {
    let mut secret = [0u8; SECRET_LEN];
    rand::rngs::OsRng.fill_bytes(&mut secret);

    println!("{}", hex::encode(secret));

    output::warning("This secret is shown once and not stored anywhere.");
    output::tip("Set it for the deployment: export SHOPVAULT_ENCRYPTION_SECRET=<value>");
    output::tip("Rotating it later invalidates every stored token — shops must re-authenticate.");

    Ok(())
}
