//! Tests for RocksDB persistence of the vault and ledger state.

use rand::Rng;
use rocksdb::DB;
use std::sync::Arc;
use vault::{Address, CustodyVault, InMemoryLedger, TokenLedger, VaultError};

fn random_address() -> Address {
    let mut rng = rand::thread_rng();
    let mut addr = [0u8; 32];
    rng.fill(&mut addr);
    addr
}

/// Tests that roles, allow-lists, records and the id counter survive a
/// reload from disk.
#[test]
fn test_vault_state_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let owner = random_address();
    let trustee = random_address();
    let sender = random_address();
    let receiver = random_address();
    let token = random_address();
    let custody = random_address();

    {
        let db = Arc::new(DB::open_default(dir.path()).unwrap());
        let mut vault = CustodyVault::new_with_db(owner, custody, Arc::clone(&db));
        let mut ledger = InMemoryLedger::new_with_db(Arc::clone(&db));

        vault.allow_token(&owner, token).unwrap();
        vault.allow_sender(&owner, sender).unwrap();
        vault.set_trustee(&owner, trustee).unwrap();

        ledger.mint(token, sender, 100).unwrap();
        ledger.authorize(token, sender, custody, 100).unwrap();
        vault
            .deposit(&mut ledger, &sender, token, 10, receiver, 1)
            .unwrap();
    }

    let db = Arc::new(DB::open_default(dir.path()).unwrap());
    let mut vault = CustodyVault::load_from_db(Arc::clone(&db)).unwrap();
    let mut ledger = InMemoryLedger::load_from_db(db).unwrap();

    assert_eq!(vault.owner(), owner);
    assert_eq!(vault.trustee(), trustee);
    assert_eq!(vault.address(), custody);
    assert!(vault.is_token_allowed(&token));
    assert!(vault.is_sender_allowed(&sender));

    let records = vault.all_deposits();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 0);
    assert_eq!(records[0].amount, 10);
    assert_eq!(vault.transfer_status(0).unwrap(), "Pending");

    // The id counter continues where it left off
    let id = vault
        .deposit(&mut ledger, &sender, token, 5, receiver, 2)
        .unwrap();
    assert_eq!(id, 1);
}

/// Tests that balances and remaining authorizations survive a reload.
#[test]
fn test_ledger_state_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let token = random_address();
    let holder = random_address();
    let custodian = random_address();

    {
        let db = Arc::new(DB::open_default(dir.path()).unwrap());
        let mut ledger = InMemoryLedger::new_with_db(db);

        ledger.mint(token, holder, 100).unwrap();
        ledger.authorize(token, holder, custodian, 60).unwrap();
        ledger.pull(token, holder, custodian, 40).unwrap();
    }

    let db = Arc::new(DB::open_default(dir.path()).unwrap());
    let ledger = InMemoryLedger::load_from_db(db).unwrap();

    assert_eq!(ledger.balance_of(token, holder), 60);
    assert_eq!(ledger.balance_of(token, custodian), 40);
    assert_eq!(ledger.allowance(token, holder, custodian), 20);
}

/// Tests that a pending deposit made before a restart can be approved after
/// it, with the funds landing correctly.
#[test]
fn test_pending_deposit_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let owner = random_address();
    let sender = random_address();
    let receiver = random_address();
    let token = random_address();
    let custody = random_address();

    {
        let db = Arc::new(DB::open_default(dir.path()).unwrap());
        let mut vault = CustodyVault::new_with_db(owner, custody, Arc::clone(&db));
        let mut ledger = InMemoryLedger::new_with_db(db);

        vault.allow_token(&owner, token).unwrap();
        vault.allow_sender(&owner, sender).unwrap();
        ledger.mint(token, sender, 100).unwrap();
        ledger.authorize(token, sender, custody, 100).unwrap();
        vault
            .deposit(&mut ledger, &sender, token, 10, receiver, 1)
            .unwrap();
    }

    let db = Arc::new(DB::open_default(dir.path()).unwrap());
    let mut vault = CustodyVault::load_from_db(Arc::clone(&db)).unwrap();
    let mut ledger = InMemoryLedger::load_from_db(db).unwrap();

    vault.approve_transfer(&mut ledger, &owner, 0).unwrap();

    assert_eq!(vault.transfer_status(0).unwrap(), "Transferred");
    assert_eq!(ledger.balance_of(token, receiver), 10);
    assert_eq!(ledger.balance_of(token, custody), 0);
}

/// Tests that a terminal record stays terminal across a reload.
#[test]
fn test_terminal_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let owner = random_address();
    let sender = random_address();
    let receiver = random_address();
    let token = random_address();
    let custody = random_address();

    {
        let db = Arc::new(DB::open_default(dir.path()).unwrap());
        let mut vault = CustodyVault::new_with_db(owner, custody, Arc::clone(&db));
        let mut ledger = InMemoryLedger::new_with_db(db);

        vault.allow_token(&owner, token).unwrap();
        vault.allow_sender(&owner, sender).unwrap();
        ledger.mint(token, sender, 100).unwrap();
        ledger.authorize(token, sender, custody, 100).unwrap();
        vault
            .deposit(&mut ledger, &sender, token, 10, receiver, 1)
            .unwrap();
        vault.revert_transfer(&mut ledger, &owner, 0).unwrap();
    }

    let db = Arc::new(DB::open_default(dir.path()).unwrap());
    let mut vault = CustodyVault::load_from_db(Arc::clone(&db)).unwrap();
    let mut ledger = InMemoryLedger::load_from_db(db).unwrap();

    assert_eq!(vault.transfer_status(0).unwrap(), "Reverted");
    assert!(matches!(
        vault.approve_transfer(&mut ledger, &owner, 0),
        Err(VaultError::InvalidDepositState { .. })
    ));
}
