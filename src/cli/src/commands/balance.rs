//! Balance command for the admin CLI.

use crate::errors::CliError;
use crate::store::{parse_address, Store};
use std::path::Path;
use vault::TokenLedger;

/// Runs the balance command. Returns the holder's balance for the token.
pub fn run<P: AsRef<Path>>(data_dir: P, token_hex: &str, holder_hex: &str) -> Result<u128, CliError> {
    let token = parse_address(token_hex)?;
    let holder = parse_address(holder_hex)?;

    let store = Store::open(data_dir)?;
    Ok(store.ledger.balance_of(token, holder))
}
