//! Mint command for the admin CLI.
//!
//! Mints into the bundled token ledger. This drives the stand-in for the
//! external token contracts and carries no vault-side permissions.

use crate::errors::CliError;
use crate::store::{parse_address, Store};
use std::path::Path;
use tracing::info;

/// Runs the mint command. Returns the recipient's new balance.
pub fn run<P: AsRef<Path>>(
    data_dir: P,
    token_hex: &str,
    to_hex: &str,
    amount: u128,
) -> Result<u128, CliError> {
    let token = parse_address(token_hex)?;
    let to = parse_address(to_hex)?;

    let mut store = Store::open(data_dir)?;
    let new_balance = store.ledger.mint(token, to, amount)?;

    info!("Minted {} of token {} to {}", amount, token_hex, to_hex);
    Ok(new_balance)
}
