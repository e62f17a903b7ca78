//! Allow-token command for the admin CLI.

use crate::errors::CliError;
use crate::store::{parse_address, Store};
use std::path::Path;
use tracing::info;
use vault::Address;

/// Runs the allow-token command.
pub fn run<P: AsRef<Path>>(data_dir: P, caller: &Address, token_hex: &str) -> Result<(), CliError> {
    let token = parse_address(token_hex)?;

    let mut store = Store::open(data_dir)?;
    store.vault.allow_token(caller, token)?;

    info!("Token {} added to the allow-list", token_hex);
    Ok(())
}
