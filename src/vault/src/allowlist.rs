//! Allow-list registry for deposit-initiating tokens and senders.

use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The sets of tokens and senders permitted to initiate deposits.
///
/// Membership is append-only: entries persist once added. Gating of the add
/// operations is the composition root's responsibility.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AllowList {
    /// Permitted token contract addresses
    tokens: HashSet<Address>,
    /// Permitted sender addresses
    senders: HashSet<Address>,
}

impl AllowList {
    /// Creates an empty allow-list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `token` to the permitted-token set. Returns true if the entry is
    /// new; adding an existing entry is a no-op.
    pub fn allow_token(&mut self, token: Address) -> bool {
        self.tokens.insert(token)
    }

    /// Adds `sender` to the permitted-sender set. Returns true if the entry
    /// is new; adding an existing entry is a no-op.
    pub fn allow_sender(&mut self, sender: Address) -> bool {
        self.senders.insert(sender)
    }

    /// Returns true if `token` is permitted.
    pub fn is_token_allowed(&self, token: &Address) -> bool {
        self.tokens.contains(token)
    }

    /// Returns true if `sender` is permitted.
    pub fn is_sender_allowed(&self, sender: &Address) -> bool {
        self.senders.contains(sender)
    }
}
