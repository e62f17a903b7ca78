//! Authorize command for the admin CLI.
//!
//! Grants the vault's custodial account the right to pull the caller's
//! tokens, the precondition for a later deposit.

use crate::errors::CliError;
use crate::store::{parse_address, Store};
use std::path::Path;
use tracing::info;
use vault::Address;

/// Runs the authorize command.
pub fn run<P: AsRef<Path>>(
    data_dir: P,
    caller: &Address,
    token_hex: &str,
    amount: u128,
) -> Result<(), CliError> {
    let token = parse_address(token_hex)?;

    let mut store = Store::open(data_dir)?;
    let custodian = store.vault.address();
    store.ledger.authorize(token, *caller, custodian, amount)?;

    info!(
        "Authorized the vault for {} of token {} held by the caller",
        amount, token_hex
    );
    Ok(())
}
