//! Deposit command for the admin CLI.

use crate::errors::CliError;
use crate::store::{parse_address, Store};
use std::path::Path;
use tracing::{debug, info};
use vault::{Address, TokenLedger};

/// Runs the deposit command. Returns the new deposit id.
pub fn run<P: AsRef<Path>>(
    data_dir: P,
    caller: &Address,
    token_hex: &str,
    amount: u128,
    receiver_hex: &str,
    tag: u64,
) -> Result<u64, CliError> {
    let token = parse_address(token_hex)?;
    let receiver = parse_address(receiver_hex)?;

    let mut store = Store::open(data_dir)?;

    let available = store.ledger.balance_of(token, *caller);
    debug!("Sender balance for token {}: {}", token_hex, available);

    let id = store
        .vault
        .deposit(&mut store.ledger, caller, token, amount, receiver, tag)?;

    info!(
        "Deposited {} of token {} for {} under id {}",
        amount, token_hex, receiver_hex, id
    );
    Ok(id)
}
