//! Allow-sender command for the admin CLI.

use crate::errors::CliError;
use crate::store::{parse_address, Store};
use std::path::Path;
use tracing::info;
use vault::Address;

/// Runs the allow-sender command.
pub fn run<P: AsRef<Path>>(
    data_dir: P,
    caller: &Address,
    sender_hex: &str,
) -> Result<(), CliError> {
    let sender = parse_address(sender_hex)?;

    let mut store = Store::open(data_dir)?;
    store.vault.allow_sender(caller, sender)?;

    info!("Sender {} added to the allow-list", sender_hex);
    Ok(())
}
