//! Core types for the custody escrow ledger.

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 32-byte address, identifying an account or a token contract.
pub type Address = [u8; 32];

/// Token balance, represented as a 128-bit unsigned integer.
pub type Balance = u128;

/// Deposit identifier, assigned at creation and never reused.
pub type DepositId = u64;

/// Caller-supplied metadata tag carried on a deposit, opaque to the vault.
pub type Tag = u64;

/// Status of a deposit held in custody.
///
/// A deposit starts `Pending` and moves exactly once to either `Transferred`
/// or `Reverted`. Both are absorbing states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepositStatus {
    /// Funds are held in custody, awaiting trustee disposition.
    Pending,
    /// Funds were released to the receiver.
    Transferred,
    /// Funds were returned to the original sender.
    Reverted,
}

impl DepositStatus {
    /// Returns the textual rendering of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            DepositStatus::Pending => "Pending",
            DepositStatus::Transferred => "Transferred",
            DepositStatus::Reverted => "Reverted",
        }
    }

    /// Returns true if the status is terminal (no further transitions).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DepositStatus::Pending)
    }
}

impl fmt::Display for DepositStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single deposit held by the vault.
///
/// All fields except `status` are immutable after creation; `status` mutates
/// only through the vault's approve/revert operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecord {
    /// The deposit identifier
    pub id: DepositId,
    /// The account that funded the deposit
    pub sender: Address,
    /// The intended beneficiary upon approval
    pub receiver: Address,
    /// The token contract whose value is held
    pub token: Address,
    /// The quantity held in custody
    pub amount: Balance,
    /// Caller-supplied metadata tag
    pub tag: Tag,
    /// Current status of the deposit
    pub status: DepositStatus,
}

impl DepositRecord {
    /// Creates a new pending deposit record.
    pub fn new(
        id: DepositId,
        sender: Address,
        receiver: Address,
        token: Address,
        amount: Balance,
        tag: Tag,
    ) -> Self {
        Self {
            id,
            sender,
            receiver,
            token,
            amount,
            tag,
            status: DepositStatus::Pending,
        }
    }

    /// Computes the SHA-256 digest of this record's immutable fields.
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();

        let mut id_bytes = [0u8; 8];
        LittleEndian::write_u64(&mut id_bytes, self.id);
        hasher.update(id_bytes);

        hasher.update(self.sender);
        hasher.update(self.receiver);
        hasher.update(self.token);

        let mut amount_bytes = [0u8; 16];
        LittleEndian::write_u128(&mut amount_bytes, self.amount);
        hasher.update(amount_bytes);

        let mut tag_bytes = [0u8; 8];
        LittleEndian::write_u64(&mut tag_bytes, self.tag);
        hasher.update(tag_bytes);

        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }
}

impl fmt::Display for DepositRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Deposit {{ id: {}, sender: {:?}, receiver: {:?}, token: {:?}, amount: {}, tag: {}, status: {} }}",
            self.id, self.sender, self.receiver, self.token, self.amount, self.tag, self.status
        )
    }
}
