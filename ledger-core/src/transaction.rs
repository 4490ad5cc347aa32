//! Transaction data structures and operations

use crate::{Amount, CoreError, CoreResult, Hash};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

/// Closed set of transaction kinds understood by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, bincode::Encode)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    /// Value transfer between two accounts
    Send,
    /// Reserved extension point, performs no state change
    ContractCall,
    /// Annotated message delivery into the receiver's inbox
    SignedMessage,
}

/// Transaction data structure
///
/// Sender and receiver are referenced by display name; the accounts
/// themselves live in the state crate. Field names double as the
/// canonical wire mapping consumed by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode)]
pub struct Transaction {
    /// Transaction kind
    pub kind: TxKind,
    /// Display name of the sending account
    pub sender_name: String,
    /// Display name of the receiving account
    pub receiver_name: String,
    /// Transfer value, meaningful only for `Send`
    pub value: Amount,
    /// Free-form message text
    pub message: String,
    /// Optional opaque data payload
    pub data: Option<Vec<u8>>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        kind: TxKind,
        sender_name: impl Into<String>,
        receiver_name: impl Into<String>,
        value: Amount,
        message: impl Into<String>,
        data: Option<Vec<u8>>,
    ) -> Self {
        Self {
            kind,
            sender_name: sender_name.into(),
            receiver_name: receiver_name.into(),
            value,
            message: message.into(),
            data,
        }
    }

    /// Create a simple value transfer
    pub fn send(sender: impl Into<String>, receiver: impl Into<String>, value: Amount) -> Self {
        Self::new(TxKind::Send, sender, receiver, value, "", None)
    }

    /// Create a contract call
    pub fn contract_call(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self::new(TxKind::ContractCall, sender, receiver, 0, "", Some(data))
    }

    /// Create a signed message delivery
    pub fn signed_message(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(TxKind::SignedMessage, sender, receiver, 0, message, None)
    }

    /// Calculate the transaction hash
    pub fn hash(&self) -> CoreResult<Hash> {
        let encoded = bincode::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| CoreError::Bincode(e.to_string()))?;
        let hash_bytes = Keccak256::digest(&encoded);
        Ok(Hash::from_slice(hash_bytes.as_slice()))
    }
}
