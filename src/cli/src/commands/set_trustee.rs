//! Set-trustee command for the admin CLI.

use crate::errors::CliError;
use crate::store::{parse_address, Store};
use std::path::Path;
use tracing::info;
use vault::Address;

/// Runs the set-trustee command.
pub fn run<P: AsRef<Path>>(data_dir: P, caller: &Address, addr_hex: &str) -> Result<(), CliError> {
    let addr = parse_address(addr_hex)?;

    let mut store = Store::open(data_dir)?;
    store.vault.set_trustee(caller, addr)?;

    info!("Trustee set to {}", addr_hex);
    Ok(())
}
