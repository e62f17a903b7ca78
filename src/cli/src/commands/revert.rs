//! Revert command for the admin CLI.

use crate::errors::CliError;
use crate::store::Store;
use std::path::Path;
use tracing::info;
use vault::Address;

/// Runs the revert command, returning a pending deposit to its sender.
pub fn run<P: AsRef<Path>>(data_dir: P, caller: &Address, deposit_id: u64) -> Result<(), CliError> {
    let mut store = Store::open(data_dir)?;

    store
        .vault
        .revert_transfer(&mut store.ledger, caller, deposit_id)?;

    info!("Deposit {} reverted", deposit_id);
    Ok(())
}
