//! The custody vault: composition root over the access registry, the
//! allow-lists and the deposit ledger.

use crate::access::AccessRegistry;
use crate::allowlist::AllowList;
use crate::errors::VaultError;
use crate::ledger::TokenLedger;
use crate::types::{Address, Balance, DepositId, DepositRecord, DepositStatus, Tag};
use rocksdb::{IteratorMode, DB};
use std::sync::Arc;
use tracing::{error, info};

/// Constants for RocksDB keys
const OWNER_KEY: &[u8] = b"vault::owner";
const TRUSTEE_KEY: &[u8] = b"vault::trustee";
const VAULT_ADDR_KEY: &[u8] = b"vault::address";
const NEXT_DEPOSIT_ID_KEY: &[u8] = b"vault::next_deposit_id";
const DEPOSIT_PREFIX: &str = "deposit::";
const ALLOWED_TOKEN_PREFIX: &str = "allowed_token::";
const ALLOWED_SENDER_PREFIX: &str = "allowed_sender::";

/// The custody vault.
///
/// Holds deposited value in its own custodial account of the token ledger
/// and releases or returns it only on trustee authorization. Exclusively
/// owns the deposit ledger, the trustee identity and both allow-lists; every
/// public operation runs to completion atomically, so precondition failures
/// leave all state untouched.
pub struct CustodyVault {
    /// The vault's own custodial account in the token ledger
    address: Address,
    /// Owner and trustee identities
    access: AccessRegistry,
    /// Permitted tokens and senders
    allowed: AllowList,
    /// Deposit records in creation order
    deposits: Vec<DepositRecord>,
    /// The next deposit id to assign
    next_deposit_id: DepositId,
    /// RocksDB instance for persistence
    db: Option<Arc<DB>>,
}

impl CustodyVault {
    /// Creates a new vault administered by `owner`, holding custody under
    /// `address`. The owner starts as the registered trustee.
    pub fn new(owner: Address, address: Address) -> Self {
        Self {
            address,
            access: AccessRegistry::new(owner),
            allowed: AllowList::new(),
            deposits: Vec::new(),
            next_deposit_id: 0,
            db: None,
        }
    }

    /// Creates a new vault with an explicitly assigned initial trustee,
    /// for deployments that keep the owner out of the trustee role from the
    /// start.
    pub fn with_trustee(owner: Address, trustee: Address, address: Address) -> Self {
        let mut vault = Self::new(owner, address);
        vault.access = AccessRegistry::from_parts(owner, trustee);
        vault
    }

    /// Creates a new vault backed by a RocksDB instance.
    pub fn new_with_db(owner: Address, address: Address, db: Arc<DB>) -> Self {
        let mut vault = Self::new(owner, address);
        vault.db = Some(db);

        // Persist the initial state to RocksDB
        if let Err(e) = vault.persist_meta() {
            error!("Failed to persist initial vault state: {}", e);
        }

        vault
    }

    /// Loads the vault state from RocksDB.
    ///
    /// Fails with `StoreError` if the store holds no vault state.
    pub fn load_from_db(db: Arc<DB>) -> Result<Self, VaultError> {
        let owner = read_address(&db, OWNER_KEY)?
            .ok_or_else(|| VaultError::StoreError("No vault state found in store".to_string()))?;
        let trustee = read_address(&db, TRUSTEE_KEY)?.unwrap_or(owner);
        let address = read_address(&db, VAULT_ADDR_KEY)?.unwrap_or(owner);

        let mut vault = Self {
            address,
            access: AccessRegistry::from_parts(owner, trustee),
            allowed: AllowList::new(),
            deposits: Vec::new(),
            next_deposit_id: 0,
            db: Some(Arc::clone(&db)),
        };

        // Load the next deposit id
        if let Some(bytes) = db
            .get(NEXT_DEPOSIT_ID_KEY)
            .map_err(|e| VaultError::StoreError(format!("Failed to get next deposit id: {}", e)))?
        {
            vault.next_deposit_id = bincode::deserialize(&bytes)
                .map_err(|e| VaultError::SerializationError(e.to_string()))?;
        }

        // Load deposits
        let iter = db.iterator(IteratorMode::From(
            DEPOSIT_PREFIX.as_bytes(),
            rocksdb::Direction::Forward,
        ));
        for item in iter {
            let (key, value) = item
                .map_err(|e| VaultError::StoreError(format!("Failed to iterate deposits: {}", e)))?;

            let key_str = String::from_utf8_lossy(&key);
            if !key_str.starts_with(DEPOSIT_PREFIX) {
                // We've moved past the deposit prefix
                break;
            }

            let record: DepositRecord = bincode::deserialize(&value)
                .map_err(|e| VaultError::SerializationError(e.to_string()))?;
            vault.deposits.push(record);
        }

        // Keys are not ordered numerically, records are
        vault.deposits.sort_by_key(|record| record.id);

        // Load allow-lists
        for addr in load_address_entries(&db, ALLOWED_TOKEN_PREFIX)? {
            vault.allowed.allow_token(addr);
        }
        for addr in load_address_entries(&db, ALLOWED_SENDER_PREFIX)? {
            vault.allowed.allow_sender(addr);
        }

        Ok(vault)
    }

    /// Persists the role and counter state to RocksDB, if configured.
    fn persist_meta(&self) -> Result<(), VaultError> {
        let db = match &self.db {
            Some(db) => db,
            None => return Ok(()),
        };

        put_bincode(db, OWNER_KEY, &self.access.owner())?;
        put_bincode(db, TRUSTEE_KEY, &self.access.trustee())?;
        put_bincode(db, VAULT_ADDR_KEY, &self.address)?;
        put_bincode(db, NEXT_DEPOSIT_ID_KEY, &self.next_deposit_id)?;

        Ok(())
    }

    /// Persists a single deposit record to RocksDB, if configured.
    fn persist_deposit(&self, record: &DepositRecord) -> Result<(), VaultError> {
        if let Some(db) = &self.db {
            let key = format!("{}{}", DEPOSIT_PREFIX, record.id);
            db.put(
                key.as_bytes(),
                bincode::serialize(record)
                    .map_err(|e| VaultError::SerializationError(e.to_string()))?,
            )
            .map_err(|e| VaultError::StoreError(format!("Failed to persist deposit: {}", e)))?;
        }
        Ok(())
    }

    /// Persists a single allow-list entry to RocksDB, if configured.
    fn persist_allowed(&self, prefix: &str, addr: &Address) -> Result<(), VaultError> {
        if let Some(db) = &self.db {
            let key = format!("{}{:?}", prefix, addr);
            db.put(
                key.as_bytes(),
                bincode::serialize(addr)
                    .map_err(|e| VaultError::SerializationError(e.to_string()))?,
            )
            .map_err(|e| {
                VaultError::StoreError(format!("Failed to persist allow-list entry: {}", e))
            })?;
        }
        Ok(())
    }

    /// Returns the vault's custodial account address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Returns the owner address.
    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    /// Returns the current trustee address.
    pub fn trustee(&self) -> Address {
        self.access.trustee()
    }

    /// Returns true if `addr` is the current trustee.
    pub fn is_trustee(&self, addr: &Address) -> bool {
        self.access.is_trustee(addr)
    }

    /// Returns true if `token` is a permitted deposit token.
    pub fn is_token_allowed(&self, token: &Address) -> bool {
        self.allowed.is_token_allowed(token)
    }

    /// Returns true if `sender` is a permitted deposit sender.
    pub fn is_sender_allowed(&self, sender: &Address) -> bool {
        self.allowed.is_sender_allowed(sender)
    }

    /// Assigns a new trustee. Trustee-gated.
    pub fn set_trustee(&mut self, caller: &Address, addr: Address) -> Result<(), VaultError> {
        self.access.set_trustee(caller, addr)?;
        self.persist_meta()
    }

    /// Hands ownership to `new_owner`. Owner-gated.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), VaultError> {
        self.access.transfer_ownership(caller, new_owner)?;
        self.persist_meta()
    }

    /// Adds `token` to the permitted-token set. Trustee-gated; idempotent.
    pub fn allow_token(&mut self, caller: &Address, token: Address) -> Result<(), VaultError> {
        self.access.require_trustee(caller, "allow_token")?;
        if self.allowed.allow_token(token) {
            info!("Token {:?} added to the allow-list", token);
        }
        self.persist_allowed(ALLOWED_TOKEN_PREFIX, &token)
    }

    /// Adds `sender` to the permitted-sender set. Trustee-gated; idempotent.
    pub fn allow_sender(&mut self, caller: &Address, sender: Address) -> Result<(), VaultError> {
        self.access.require_trustee(caller, "allow_sender")?;
        if self.allowed.allow_sender(sender) {
            info!("Sender {:?} added to the allow-list", sender);
        }
        self.persist_allowed(ALLOWED_SENDER_PREFIX, &sender)
    }

    /// Accepts a deposit from `caller` for `receiver`, taking custody of
    /// `amount` of `token`.
    ///
    /// The sender allow-list is checked before the token allow-list, so a
    /// disallowed sender is rejected even when the token is permitted. The
    /// pull requires `caller` to have pre-authorized the vault's custodial
    /// account.
    ///
    /// # Arguments
    ///
    /// * `ledger` - The token ledger to pull funds through
    /// * `caller` - The depositing sender
    /// * `token` - The token contract address
    /// * `amount` - The amount to take into custody
    /// * `receiver` - The beneficiary upon approval
    /// * `tag` - Caller-supplied metadata tag
    ///
    /// # Returns
    ///
    /// `Ok(deposit_id)` of the new pending record, `Err(VaultError)`
    /// otherwise with no state changed
    pub fn deposit(
        &mut self,
        ledger: &mut dyn TokenLedger,
        caller: &Address,
        token: Address,
        amount: Balance,
        receiver: Address,
        tag: Tag,
    ) -> Result<DepositId, VaultError> {
        if !self.allowed.is_sender_allowed(caller) {
            return Err(VaultError::AddressNotRegistered(format!(
                "Sender {:?} is not an allowed sender",
                caller
            )));
        }
        if !self.allowed.is_token_allowed(&token) {
            return Err(VaultError::AddressNotRegistered(format!(
                "Token {:?} is not an allowed token",
                token
            )));
        }

        // Take custody before recording; a failed pull changes nothing
        ledger.pull(token, *caller, self.address, amount)?;

        let id = self.next_deposit_id;
        let record = DepositRecord::new(id, *caller, receiver, token, amount, tag);
        self.next_deposit_id += 1;

        self.persist_deposit(&record)?;
        self.persist_meta()?;

        info!(
            "Deposit {} recorded: {} of token {:?} from {:?} for {:?}",
            id, amount, token, caller, receiver
        );

        self.deposits.push(record);
        Ok(id)
    }

    /// Releases a pending deposit to its receiver. Trustee-gated.
    ///
    /// # Arguments
    ///
    /// * `ledger` - The token ledger to push funds through
    /// * `caller` - The invoking identity, must be the trustee
    /// * `deposit_id` - The pending record to release
    ///
    /// # Returns
    ///
    /// `Ok(())` if the funds reached the receiver and the record is
    /// `Transferred`, `Err(VaultError)` otherwise with no state changed
    pub fn approve_transfer(
        &mut self,
        ledger: &mut dyn TokenLedger,
        caller: &Address,
        deposit_id: DepositId,
    ) -> Result<(), VaultError> {
        self.access.require_trustee(caller, "approve_transfer")?;

        let index = self.pending_index(deposit_id)?;
        let (token, receiver, amount) = {
            let record = &self.deposits[index];
            (record.token, record.receiver, record.amount)
        };

        ledger.push(token, self.address, receiver, amount)?;

        self.deposits[index].status = DepositStatus::Transferred;
        let record = self.deposits[index].clone();
        self.persist_deposit(&record)?;

        info!(
            "Deposit {} approved: {} of token {:?} released to {:?}",
            deposit_id, amount, token, receiver
        );
        Ok(())
    }

    /// Returns a pending deposit to its original sender. Trustee-gated.
    pub fn revert_transfer(
        &mut self,
        ledger: &mut dyn TokenLedger,
        caller: &Address,
        deposit_id: DepositId,
    ) -> Result<(), VaultError> {
        self.access.require_trustee(caller, "revert_transfer")?;

        let index = self.pending_index(deposit_id)?;
        let (token, sender, amount) = {
            let record = &self.deposits[index];
            (record.token, record.sender, record.amount)
        };

        ledger.push(token, self.address, sender, amount)?;

        self.deposits[index].status = DepositStatus::Reverted;
        let record = self.deposits[index].clone();
        self.persist_deposit(&record)?;

        info!(
            "Deposit {} reverted: {} of token {:?} returned to {:?}",
            deposit_id, amount, token, sender
        );
        Ok(())
    }

    /// Returns the textual status of a deposit.
    pub fn transfer_status(&self, deposit_id: DepositId) -> Result<&'static str, VaultError> {
        let record = self
            .get_deposit(deposit_id)
            .ok_or_else(|| VaultError::InvalidDepositState {
                deposit_id,
                reason: "deposit not found".to_string(),
            })?;
        Ok(record.status.as_str())
    }

    /// Returns a deposit record by id.
    pub fn get_deposit(&self, deposit_id: DepositId) -> Option<&DepositRecord> {
        self.deposits
            .iter()
            .find(|record| record.id == deposit_id)
    }

    /// Returns all deposit records in creation order.
    pub fn all_deposits(&self) -> &[DepositRecord] {
        &self.deposits
    }

    /// Resolves `deposit_id` to its index, requiring a pending record.
    fn pending_index(&self, deposit_id: DepositId) -> Result<usize, VaultError> {
        let index = self
            .deposits
            .iter()
            .position(|record| record.id == deposit_id)
            .ok_or_else(|| VaultError::InvalidDepositState {
                deposit_id,
                reason: "deposit not found".to_string(),
            })?;

        let status = self.deposits[index].status;
        if status != DepositStatus::Pending {
            return Err(VaultError::InvalidDepositState {
                deposit_id,
                reason: format!("deposit is already {}", status),
            });
        }

        Ok(index)
    }
}

/// Writes a bincode-encoded value under `key`.
fn put_bincode<T: serde::Serialize>(db: &DB, key: &[u8], value: &T) -> Result<(), VaultError> {
    db.put(
        key,
        bincode::serialize(value).map_err(|e| VaultError::SerializationError(e.to_string()))?,
    )
    .map_err(|e| VaultError::StoreError(format!("Failed to persist vault state: {}", e)))
}

/// Reads a bincode-encoded address under `key`, if present.
fn read_address(db: &DB, key: &[u8]) -> Result<Option<Address>, VaultError> {
    match db
        .get(key)
        .map_err(|e| VaultError::StoreError(format!("Failed to read vault state: {}", e)))?
    {
        Some(bytes) => {
            let addr = bincode::deserialize(&bytes)
                .map_err(|e| VaultError::SerializationError(e.to_string()))?;
            Ok(Some(addr))
        }
        None => Ok(None),
    }
}

/// Loads every address entry stored under `prefix`.
fn load_address_entries(db: &DB, prefix: &str) -> Result<Vec<Address>, VaultError> {
    let mut entries = Vec::new();
    let iter = db.iterator(IteratorMode::From(
        prefix.as_bytes(),
        rocksdb::Direction::Forward,
    ));

    for item in iter {
        let (key, value) = item.map_err(|e| {
            VaultError::StoreError(format!("Failed to iterate allow-list entries: {}", e))
        })?;

        let key_str = String::from_utf8_lossy(&key);
        if !key_str.starts_with(prefix) {
            break;
        }

        let addr: Address = bincode::deserialize(&value)
            .map_err(|e| VaultError::SerializationError(e.to_string()))?;
        entries.push(addr);
    }

    Ok(entries)
}
