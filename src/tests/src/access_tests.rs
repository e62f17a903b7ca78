//! Tests for trustee and ownership management.

use rand::Rng;
use vault::{Address, CustodyVault, VaultError};

fn random_address() -> Address {
    let mut rng = rand::thread_rng();
    let mut addr = [0u8; 32];
    rng.fill(&mut addr);
    addr
}

/// Pins down the initial-authority semantics: the constructing identity is
/// auto-registered as trustee and can exercise every trustee-gated operation
/// before any explicit assignment.
#[test]
fn test_owner_holds_trustee_authority_at_construction() {
    let owner = random_address();
    let token = random_address();
    let sender = random_address();
    let mut vault = CustodyVault::new(owner, random_address());

    assert!(vault.is_trustee(&owner));

    vault.allow_token(&owner, token).unwrap();
    vault.allow_sender(&owner, sender).unwrap();
    assert!(vault.is_token_allowed(&token));
    assert!(vault.is_sender_allowed(&sender));
}

/// Tests the alternative construction where the initial trustee is assigned
/// explicitly and the owner never holds trustee authority.
#[test]
fn test_explicit_initial_trustee_keeps_owner_out() {
    let owner = random_address();
    let trustee = random_address();
    let token = random_address();
    let mut vault = CustodyVault::with_trustee(owner, trustee, random_address());

    assert!(vault.is_trustee(&trustee));
    assert!(!vault.is_trustee(&owner));

    assert!(matches!(
        vault.allow_token(&owner, token),
        Err(VaultError::NotTrustee(_))
    ));
    vault.allow_token(&trustee, token).unwrap();
    assert!(vault.is_token_allowed(&token));
}

/// Tests that assigning a trustee makes exactly that address the trustee.
#[test]
fn test_set_trustee_assigns_single_trustee() {
    let owner = random_address();
    let trustee = random_address();
    let outsider = random_address();
    let mut vault = CustodyVault::new(owner, random_address());

    vault.set_trustee(&owner, trustee).unwrap();

    assert!(vault.is_trustee(&trustee));
    assert!(!vault.is_trustee(&owner));
    assert!(!vault.is_trustee(&outsider));
    assert_eq!(vault.trustee(), trustee);
}

/// Tests that a non-trustee cannot assign the trustee, and that the failed
/// call changes nothing.
#[test]
fn test_set_trustee_rejected_for_non_trustee() {
    let owner = random_address();
    let outsider = random_address();
    let mut vault = CustodyVault::new(owner, random_address());

    let result = vault.set_trustee(&outsider, outsider);
    assert!(matches!(result, Err(VaultError::NotTrustee(_))));
    assert_eq!(vault.trustee(), owner);
}

/// Tests that re-assigning the same trustee is accepted.
#[test]
fn test_set_trustee_is_idempotent() {
    let owner = random_address();
    let trustee = random_address();
    let mut vault = CustodyVault::new(owner, random_address());

    vault.set_trustee(&owner, trustee).unwrap();
    vault.set_trustee(&trustee, trustee).unwrap();
    assert!(vault.is_trustee(&trustee));
}

/// Tests that trustee-gated registry mutations from a non-trustee leave the
/// registries unchanged.
#[test]
fn test_gated_mutations_leave_registries_unchanged() {
    let owner = random_address();
    let outsider = random_address();
    let token = random_address();
    let sender = random_address();
    let mut vault = CustodyVault::new(owner, random_address());

    assert!(matches!(
        vault.allow_token(&outsider, token),
        Err(VaultError::NotTrustee(_))
    ));
    assert!(matches!(
        vault.allow_sender(&outsider, sender),
        Err(VaultError::NotTrustee(_))
    ));

    assert!(!vault.is_token_allowed(&token));
    assert!(!vault.is_sender_allowed(&sender));
}

/// Tests that ownership rotates only on the owner's say-so, and that the new
/// owner does not implicitly gain trustee authority.
#[test]
fn test_transfer_ownership() {
    let owner = random_address();
    let next_owner = random_address();
    let mut vault = CustodyVault::new(owner, random_address());

    assert!(matches!(
        vault.transfer_ownership(&next_owner, next_owner),
        Err(VaultError::NotAuthorized(_))
    ));

    vault.transfer_ownership(&owner, next_owner).unwrap();
    assert_eq!(vault.owner(), next_owner);

    // Trustee authority stays where it was
    assert!(vault.is_trustee(&owner));
    assert!(!vault.is_trustee(&next_owner));
}
