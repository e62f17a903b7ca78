//! Access control registry: the owner and the single active trustee.

use crate::errors::VaultError;
use crate::types::Address;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Tracks the contract owner and the single active trustee.
///
/// The constructing identity starts as both owner and trustee, so the
/// administering account can configure allow-lists and rotate the trustee
/// before any explicit assignment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccessRegistry {
    /// The owning identity, set at construction
    owner: Address,
    /// The active trustee
    trustee: Address,
}

impl AccessRegistry {
    /// Creates a new registry with `owner` registered as the initial trustee.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            trustee: owner,
        }
    }

    /// Restores a registry from previously persisted state.
    pub fn from_parts(owner: Address, trustee: Address) -> Self {
        Self { owner, trustee }
    }

    /// Returns the owner address.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Returns the current trustee address.
    pub fn trustee(&self) -> Address {
        self.trustee
    }

    /// Returns true if `addr` is the current trustee.
    pub fn is_trustee(&self, addr: &Address) -> bool {
        self.trustee == *addr
    }

    /// Returns true if `addr` is the owner.
    pub fn is_owner(&self, addr: &Address) -> bool {
        self.owner == *addr
    }

    /// Fails with `NotTrustee` unless `caller` is the current trustee.
    pub fn require_trustee(&self, caller: &Address, action: &str) -> Result<(), VaultError> {
        if !self.is_trustee(caller) {
            return Err(VaultError::NotTrustee(format!(
                "{} requires the trustee: expected {:?}, got {:?}",
                action, self.trustee, caller
            )));
        }
        Ok(())
    }

    /// Assigns a new trustee. Trustee-gated; overwrites unconditionally.
    pub fn set_trustee(&mut self, caller: &Address, addr: Address) -> Result<(), VaultError> {
        self.require_trustee(caller, "set_trustee")?;
        self.trustee = addr;
        info!("Trustee set to {:?}", addr);
        Ok(())
    }

    /// Hands ownership to `new_owner`. Owner-gated.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), VaultError> {
        if !self.is_owner(caller) {
            return Err(VaultError::NotAuthorized(format!(
                "transfer_ownership requires the owner: expected {:?}, got {:?}",
                self.owner, caller
            )));
        }
        self.owner = new_owner;
        info!("Ownership transferred to {:?}", new_owner);
        Ok(())
    }
}
