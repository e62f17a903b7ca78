//! Status command for the admin CLI.

use crate::errors::CliError;
use crate::store::Store;
use std::path::Path;

/// Runs the status command. Returns the textual status of a deposit.
pub fn run<P: AsRef<Path>>(data_dir: P, deposit_id: u64) -> Result<String, CliError> {
    let store = Store::open(data_dir)?;

    let status = store.vault.transfer_status(deposit_id)?;
    Ok(status.to_string())
}
