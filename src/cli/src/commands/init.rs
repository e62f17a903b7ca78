//! Init command for the admin CLI.

use crate::errors::CliError;
use crate::store::{format_address, parse_address, Store};
use std::path::Path;
use tracing::info;

/// Runs the init command. Returns the vault's custodial account address.
pub fn run<P: AsRef<Path>>(data_dir: P, owner_hex: &str) -> Result<String, CliError> {
    let owner = parse_address(owner_hex)?;

    let store = Store::init(data_dir, owner)?;
    let custody = store.vault.address();

    info!(
        "Initialized vault store: owner {:?}, custody account {:?}",
        owner, custody
    );

    Ok(format_address(&custody))
}
