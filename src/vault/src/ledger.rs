//! Token ledger collaborator for the custody vault.
//!
//! The vault itself never holds balances; it moves value through a
//! [`TokenLedger`], which exposes the two custodial primitives the vault
//! depends on. [`InMemoryLedger`] is the bundled fungible-balance store used
//! by the CLI harness and the test suite.

use crate::errors::VaultError;
use crate::types::{Address, Balance};
use rocksdb::{IteratorMode, DB};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// The external token-ledger contract the vault depends on.
///
/// Both transfer primitives are atomic: they either complete fully or fail
/// with no effect on any balance.
pub trait TokenLedger {
    /// Moves `amount` of `token` from `holder` into `custodian`'s balance.
    ///
    /// Requires `holder` to have previously authorized `custodian` for at
    /// least `amount`; the authorization is consumed by the pull.
    fn pull(
        &mut self,
        token: Address,
        holder: Address,
        custodian: Address,
        amount: Balance,
    ) -> Result<(), VaultError>;

    /// Moves `amount` of `token` out of `custodian`'s balance to `recipient`.
    fn push(
        &mut self,
        token: Address,
        custodian: Address,
        recipient: Address,
        amount: Balance,
    ) -> Result<(), VaultError>;

    /// Returns the balance of `holder` for `token`.
    fn balance_of(&self, token: Address, holder: Address) -> Balance;
}

/// Constants for RocksDB keys
const BALANCE_PREFIX: &str = "balance::";
const ALLOWANCE_PREFIX: &str = "allowance::";

/// A persisted balance entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct BalanceEntry {
    token: Address,
    holder: Address,
    amount: Balance,
}

/// A persisted allowance entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct AllowanceEntry {
    token: Address,
    holder: Address,
    custodian: Address,
    amount: Balance,
}

/// An in-memory fungible-balance store with optional RocksDB persistence.
///
/// Stands in for the external token contracts: per-token balances, mint,
/// and holder-granted authorizations consumed by custodial pulls.
pub struct InMemoryLedger {
    /// Balances by (token, holder) pair
    balances: HashMap<(Address, Address), Balance>,
    /// Authorizations by (token, holder, custodian) triple
    allowances: HashMap<(Address, Address, Address), Balance>,
    /// RocksDB instance for persistence
    db: Option<Arc<DB>>,
}

impl InMemoryLedger {
    /// Creates a new empty ledger.
    pub fn new_zero() -> Self {
        Self {
            balances: HashMap::new(),
            allowances: HashMap::new(),
            db: None,
        }
    }

    /// Creates a new empty ledger backed by a RocksDB instance.
    pub fn new_with_db(db: Arc<DB>) -> Self {
        let mut ledger = Self::new_zero();
        ledger.db = Some(db);
        ledger
    }

    /// Loads the ledger state from RocksDB.
    pub fn load_from_db(db: Arc<DB>) -> Result<Self, VaultError> {
        let mut ledger = Self::new_zero();
        ledger.db = Some(Arc::clone(&db));

        // Load balances
        let iter = db.iterator(IteratorMode::From(
            BALANCE_PREFIX.as_bytes(),
            rocksdb::Direction::Forward,
        ));
        for item in iter {
            let (key, value) = item
                .map_err(|e| VaultError::StoreError(format!("Failed to iterate balances: {}", e)))?;

            let key_str = String::from_utf8_lossy(&key);
            if !key_str.starts_with(BALANCE_PREFIX) {
                // We've moved past the balance prefix
                break;
            }

            let entry: BalanceEntry = bincode::deserialize(&value)
                .map_err(|e| VaultError::SerializationError(e.to_string()))?;
            ledger
                .balances
                .insert((entry.token, entry.holder), entry.amount);
        }

        // Load allowances
        let iter = db.iterator(IteratorMode::From(
            ALLOWANCE_PREFIX.as_bytes(),
            rocksdb::Direction::Forward,
        ));
        for item in iter {
            let (key, value) = item.map_err(|e| {
                VaultError::StoreError(format!("Failed to iterate allowances: {}", e))
            })?;

            let key_str = String::from_utf8_lossy(&key);
            if !key_str.starts_with(ALLOWANCE_PREFIX) {
                break;
            }

            let entry: AllowanceEntry = bincode::deserialize(&value)
                .map_err(|e| VaultError::SerializationError(e.to_string()))?;
            ledger
                .allowances
                .insert((entry.token, entry.holder, entry.custodian), entry.amount);
        }

        Ok(ledger)
    }

    /// Persists a balance entry to RocksDB, if a DB is configured.
    fn persist_balance(&self, token: &Address, holder: &Address) -> Result<(), VaultError> {
        if let Some(db) = &self.db {
            let amount = self
                .balances
                .get(&(*token, *holder))
                .copied()
                .unwrap_or(0);
            let entry = BalanceEntry {
                token: *token,
                holder: *holder,
                amount,
            };
            let key = format!("{}{:?}:{:?}", BALANCE_PREFIX, token, holder);
            db.put(
                key.as_bytes(),
                bincode::serialize(&entry)
                    .map_err(|e| VaultError::SerializationError(e.to_string()))?,
            )
            .map_err(|e| VaultError::StoreError(format!("Failed to persist balance: {}", e)))?;
        }
        Ok(())
    }

    /// Persists an allowance entry to RocksDB, if a DB is configured.
    fn persist_allowance(
        &self,
        token: &Address,
        holder: &Address,
        custodian: &Address,
    ) -> Result<(), VaultError> {
        if let Some(db) = &self.db {
            let amount = self
                .allowances
                .get(&(*token, *holder, *custodian))
                .copied()
                .unwrap_or(0);
            let entry = AllowanceEntry {
                token: *token,
                holder: *holder,
                custodian: *custodian,
                amount,
            };
            let key = format!(
                "{}{:?}:{:?}:{:?}",
                ALLOWANCE_PREFIX, token, holder, custodian
            );
            db.put(
                key.as_bytes(),
                bincode::serialize(&entry)
                    .map_err(|e| VaultError::SerializationError(e.to_string()))?,
            )
            .map_err(|e| VaultError::StoreError(format!("Failed to persist allowance: {}", e)))?;
        }
        Ok(())
    }

    /// Mints `amount` of `token` to `to`.
    pub fn mint(
        &mut self,
        token: Address,
        to: Address,
        amount: Balance,
    ) -> Result<Balance, VaultError> {
        let balance = self.balances.entry((token, to)).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(VaultError::BalanceOverflow)?;
        let new_balance = *balance;

        self.persist_balance(&token, &to)?;

        info!("Minted {} of token {:?} to {:?}", amount, token, to);
        Ok(new_balance)
    }

    /// Grants `custodian` the right to pull up to `amount` of `token` from
    /// `holder`. Overwrites any previous authorization.
    pub fn authorize(
        &mut self,
        token: Address,
        holder: Address,
        custodian: Address,
        amount: Balance,
    ) -> Result<(), VaultError> {
        self.allowances.insert((token, holder, custodian), amount);
        self.persist_allowance(&token, &holder, &custodian)?;

        debug!(
            "Authorized {:?} for {} of token {:?} held by {:?}",
            custodian, amount, token, holder
        );
        Ok(())
    }

    /// Returns the remaining authorization of `custodian` over `holder`'s
    /// balance of `token`.
    pub fn allowance(&self, token: Address, holder: Address, custodian: Address) -> Balance {
        self.allowances
            .get(&(token, holder, custodian))
            .copied()
            .unwrap_or(0)
    }
}

impl TokenLedger for InMemoryLedger {
    /// Moves `amount` of `token` from `holder` into `custodian`'s balance.
    ///
    /// # Arguments
    ///
    /// * `token` - The token contract address
    /// * `holder` - The account being debited
    /// * `custodian` - The account taking custody
    /// * `amount` - The amount to move
    ///
    /// # Returns
    ///
    /// `Ok(())` if the pull completed, `Err(VaultError)` otherwise with no
    /// balance changed
    fn pull(
        &mut self,
        token: Address,
        holder: Address,
        custodian: Address,
        amount: Balance,
    ) -> Result<(), VaultError> {
        // Check the authorization
        let allowed = self.allowance(token, holder, custodian);
        if allowed < amount {
            return Err(VaultError::TransferFailed(format!(
                "Pull of {} exceeds authorization of {} for custodian {:?}",
                amount, allowed, custodian
            )));
        }

        // Check the holder's balance
        let holder_balance = self.balance_of(token, holder);
        if holder_balance < amount {
            return Err(VaultError::InsufficientFunds {
                required: amount,
                available: holder_balance,
            });
        }

        // Check the custodian's balance for overflow before mutating anything
        let custodian_balance = self.balance_of(token, custodian);
        let new_custodian = custodian_balance
            .checked_add(amount)
            .ok_or(VaultError::BalanceOverflow)?;

        self.balances.insert((token, holder), holder_balance - amount);
        self.balances.insert((token, custodian), new_custodian);
        self.allowances
            .insert((token, holder, custodian), allowed - amount);

        self.persist_balance(&token, &holder)?;
        self.persist_balance(&token, &custodian)?;
        self.persist_allowance(&token, &holder, &custodian)?;

        debug!(
            "Pulled {} of token {:?} from {:?} into custody of {:?}",
            amount, token, holder, custodian
        );
        Ok(())
    }

    /// Moves `amount` of `token` out of `custodian`'s balance to `recipient`.
    ///
    /// # Arguments
    ///
    /// * `token` - The token contract address
    /// * `custodian` - The account releasing custody
    /// * `recipient` - The account being credited
    /// * `amount` - The amount to move
    ///
    /// # Returns
    ///
    /// `Ok(())` if the push completed, `Err(VaultError)` otherwise with no
    /// balance changed
    fn push(
        &mut self,
        token: Address,
        custodian: Address,
        recipient: Address,
        amount: Balance,
    ) -> Result<(), VaultError> {
        // Check the custodian's balance
        let custodian_balance = self.balance_of(token, custodian);
        if custodian_balance < amount {
            return Err(VaultError::InsufficientFunds {
                required: amount,
                available: custodian_balance,
            });
        }

        let recipient_balance = self.balance_of(token, recipient);
        let new_recipient = recipient_balance
            .checked_add(amount)
            .ok_or(VaultError::BalanceOverflow)?;

        self.balances
            .insert((token, custodian), custodian_balance - amount);
        self.balances.insert((token, recipient), new_recipient);

        self.persist_balance(&token, &custodian)?;
        self.persist_balance(&token, &recipient)?;

        debug!(
            "Pushed {} of token {:?} from custody of {:?} to {:?}",
            amount, token, custodian, recipient
        );
        Ok(())
    }

    fn balance_of(&self, token: Address, holder: Address) -> Balance {
        self.balances.get(&(token, holder)).copied().unwrap_or(0)
    }
}
