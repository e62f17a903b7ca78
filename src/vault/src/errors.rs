//! Error types for the vault crate.

use thiserror::Error;

/// Errors that can occur in the vault crate.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Error when a caller lacks owner privilege for an owner-only action.
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// Error when a caller lacks trustee privilege for a trustee-gated action.
    #[error("Not trustee: {0}")]
    NotTrustee(String),

    /// Error when a sender or token is missing from the relevant allow-list.
    #[error("Address not registered: {0}")]
    AddressNotRegistered(String),

    /// Error when approve/revert targets a record that does not exist or is
    /// not pending.
    #[error("Invalid deposit state for id {deposit_id}: {reason}")]
    InvalidDepositState {
        /// The targeted deposit id
        deposit_id: u64,
        /// Why the record cannot transition
        reason: String,
    },

    /// Error when a custodial pull or push exceeds the holder's balance.
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// The required balance
        required: u128,
        /// The available balance
        available: u128,
    },

    /// Error when a token transfer cannot complete for any other reason.
    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    /// Error when a balance update overflows.
    #[error("Balance overflow")]
    BalanceOverflow,

    /// Error when an operation on the backing store fails.
    #[error("Store error: {0}")]
    StoreError(String),

    /// Error when serialization or deserialization fails.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}
