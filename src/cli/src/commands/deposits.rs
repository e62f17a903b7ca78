//! Deposits command for the admin CLI.

use crate::errors::CliError;
use crate::store::Store;
use std::path::Path;
use vault::DepositRecord;

/// Runs the deposits command. Returns all records in creation order.
pub fn run<P: AsRef<Path>>(data_dir: P) -> Result<Vec<DepositRecord>, CliError> {
    let store = Store::open(data_dir)?;

    Ok(store.vault.all_deposits().to_vec())
}
