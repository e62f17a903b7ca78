//! Approve command for the admin CLI.

use crate::errors::CliError;
use crate::store::Store;
use std::path::Path;
use tracing::info;
use vault::Address;

/// Runs the approve command, releasing a pending deposit to its receiver.
pub fn run<P: AsRef<Path>>(data_dir: P, caller: &Address, deposit_id: u64) -> Result<(), CliError> {
    let mut store = Store::open(data_dir)?;

    store
        .vault
        .approve_transfer(&mut store.ledger, caller, deposit_id)?;

    info!("Deposit {} approved", deposit_id);
    Ok(())
}
