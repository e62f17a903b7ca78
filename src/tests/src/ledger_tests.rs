//! Tests for the bundled token ledger.

use rand::Rng;
use vault::{Address, InMemoryLedger, TokenLedger, VaultError};

fn random_address() -> Address {
    let mut rng = rand::thread_rng();
    let mut addr = [0u8; 32];
    rng.fill(&mut addr);
    addr
}

/// Tests minting and balance lookup.
#[test]
fn test_mint_and_balance() {
    let mut ledger = InMemoryLedger::new_zero();
    let token = random_address();
    let holder = random_address();

    assert_eq!(ledger.balance_of(token, holder), 0);

    let new_balance = ledger.mint(token, holder, 250).unwrap();
    assert_eq!(new_balance, 250);
    assert_eq!(ledger.balance_of(token, holder), 250);

    // Balances are per token
    assert_eq!(ledger.balance_of(random_address(), holder), 0);
}

/// Tests that a custodial pull consumes the authorization and moves the
/// balance.
#[test]
fn test_authorize_and_pull() {
    let mut ledger = InMemoryLedger::new_zero();
    let token = random_address();
    let holder = random_address();
    let custodian = random_address();

    ledger.mint(token, holder, 100).unwrap();
    ledger.authorize(token, holder, custodian, 60).unwrap();
    assert_eq!(ledger.allowance(token, holder, custodian), 60);

    ledger.pull(token, holder, custodian, 40).unwrap();

    assert_eq!(ledger.balance_of(token, holder), 60);
    assert_eq!(ledger.balance_of(token, custodian), 40);
    assert_eq!(ledger.allowance(token, holder, custodian), 20);
}

/// Tests that a pull without sufficient authorization fails with no balance
/// changed.
#[test]
fn test_pull_exceeding_authorization_fails() {
    let mut ledger = InMemoryLedger::new_zero();
    let token = random_address();
    let holder = random_address();
    let custodian = random_address();

    ledger.mint(token, holder, 100).unwrap();
    ledger.authorize(token, holder, custodian, 10).unwrap();

    let result = ledger.pull(token, holder, custodian, 40);
    assert!(matches!(result, Err(VaultError::TransferFailed(_))));

    assert_eq!(ledger.balance_of(token, holder), 100);
    assert_eq!(ledger.balance_of(token, custodian), 0);
    assert_eq!(ledger.allowance(token, holder, custodian), 10);
}

/// Tests that a pull exceeding the holder's balance fails even when
/// authorized.
#[test]
fn test_pull_exceeding_balance_fails() {
    let mut ledger = InMemoryLedger::new_zero();
    let token = random_address();
    let holder = random_address();
    let custodian = random_address();

    ledger.mint(token, holder, 30).unwrap();
    ledger.authorize(token, holder, custodian, 100).unwrap();

    let result = ledger.pull(token, holder, custodian, 40);
    assert!(matches!(
        result,
        Err(VaultError::InsufficientFunds {
            required: 40,
            available: 30
        })
    ));
    assert_eq!(ledger.balance_of(token, holder), 30);
}

/// Tests that a push moves funds out of custody.
#[test]
fn test_push_moves_funds() {
    let mut ledger = InMemoryLedger::new_zero();
    let token = random_address();
    let custodian = random_address();
    let recipient = random_address();

    ledger.mint(token, custodian, 75).unwrap();
    ledger.push(token, custodian, recipient, 50).unwrap();

    assert_eq!(ledger.balance_of(token, custodian), 25);
    assert_eq!(ledger.balance_of(token, recipient), 50);
}

/// Tests that a push exceeding the custodian's balance fails cleanly.
#[test]
fn test_push_exceeding_balance_fails() {
    let mut ledger = InMemoryLedger::new_zero();
    let token = random_address();
    let custodian = random_address();
    let recipient = random_address();

    ledger.mint(token, custodian, 10).unwrap();

    let result = ledger.push(token, custodian, recipient, 50);
    assert!(matches!(
        result,
        Err(VaultError::InsufficientFunds { .. })
    ));
    assert_eq!(ledger.balance_of(token, custodian), 10);
    assert_eq!(ledger.balance_of(token, recipient), 0);
}

/// Tests that minting past the balance type's range is rejected.
#[test]
fn test_mint_overflow_is_rejected() {
    let mut ledger = InMemoryLedger::new_zero();
    let token = random_address();
    let holder = random_address();

    ledger.mint(token, holder, u128::MAX).unwrap();

    let result = ledger.mint(token, holder, 1);
    assert!(matches!(result, Err(VaultError::BalanceOverflow)));
    assert_eq!(ledger.balance_of(token, holder), u128::MAX);
}

/// Tests that a re-authorization overwrites the previous grant.
#[test]
fn test_authorize_overwrites_previous_grant() {
    let mut ledger = InMemoryLedger::new_zero();
    let token = random_address();
    let holder = random_address();
    let custodian = random_address();

    ledger.authorize(token, holder, custodian, 60).unwrap();
    ledger.authorize(token, holder, custodian, 15).unwrap();
    assert_eq!(ledger.allowance(token, holder, custodian), 15);
}
