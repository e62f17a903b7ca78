//! Core custody ledger for trustee-mediated token transfers.
//!
//! This crate provides the custody vault state machine together with its
//! access-control and allow-list registries: deposits pulled into custody
//! from pre-approved senders, held under a pending record, and released or
//! returned only on trustee authorization.

pub mod access;
pub mod allowlist;
pub mod errors;
pub mod ledger;
pub mod types;
pub mod vault;

// Re-export commonly used types
pub use access::AccessRegistry;
pub use allowlist::AllowList;
pub use errors::VaultError;
pub use ledger::{InMemoryLedger, TokenLedger};
pub use types::{Address, Balance, DepositId, DepositRecord, DepositStatus, Tag};
pub use vault::CustodyVault;
