//! Store access for the admin CLI.
//!
//! Every command opens the same RocksDB directory, which holds both the
//! vault state and the bundled token ledger standing in for the external
//! token contracts.

use crate::errors::CliError;
use rocksdb::{Options, DB};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use vault::{Address, CustodyVault, InMemoryLedger};

/// The vault and token ledger loaded from one RocksDB directory.
pub struct Store {
    /// The custody vault
    pub vault: CustodyVault,
    /// The bundled token ledger
    pub ledger: InMemoryLedger,
}

impl Store {
    /// Initializes a fresh store at `path`, registering `owner` as the
    /// vault's owner and initial trustee.
    pub fn init<P: AsRef<Path>>(path: P, owner: Address) -> Result<Self, CliError> {
        let db = open_db(path)?;

        if CustodyVault::load_from_db(Arc::clone(&db)).is_ok() {
            return Err(CliError::StoreError(
                "Store is already initialized".to_string(),
            ));
        }

        let vault = CustodyVault::new_with_db(owner, custody_address(&owner), Arc::clone(&db));
        let ledger = InMemoryLedger::new_with_db(db);

        Ok(Self { vault, ledger })
    }

    /// Opens an existing store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let db = open_db(path)?;

        let vault = CustodyVault::load_from_db(Arc::clone(&db))?;
        let ledger = InMemoryLedger::load_from_db(db)?;

        Ok(Self { vault, ledger })
    }
}

/// Opens the RocksDB directory, creating it if missing.
fn open_db<P: AsRef<Path>>(path: P) -> Result<Arc<DB>, CliError> {
    let mut options = Options::default();
    options.create_if_missing(true);

    let db = DB::open(&options, path)?;
    Ok(Arc::new(db))
}

/// Derives the vault's custodial account address from the owner address.
pub fn custody_address(owner: &Address) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(b"custody-vault::");
    hasher.update(owner);

    let result = hasher.finalize();
    let mut addr = [0u8; 32];
    addr.copy_from_slice(&result);
    addr
}

/// Parses a 32-byte hex address, with or without a leading "0x".
pub fn parse_address(s: &str) -> Result<Address, CliError> {
    let stripped = s.trim_start_matches("0x");
    let bytes = hex::decode(stripped)
        .map_err(|e| CliError::InvalidAddress(format!("{}: {}", s, e)))?;

    if bytes.len() != 32 {
        return Err(CliError::InvalidAddress(format!(
            "{}: expected 32 bytes, got {}",
            s,
            bytes.len()
        )));
    }

    let mut addr = [0u8; 32];
    addr.copy_from_slice(&bytes);
    Ok(addr)
}

/// Formats an address as a 0x-prefixed hex string.
pub fn format_address(addr: &Address) -> String {
    format!("0x{}", hex::encode(addr))
}
