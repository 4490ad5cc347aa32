//! Account model

use crate::{Keypair, StateError, StateResult};
use ledger_core::Amount;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Account identifier, assigned at registration
pub type AccountId = u64;

/// A registered account: identity, balance and inbox
///
/// The balance is the authoritative store; the ledger's snapshot only
/// feeds the state-root digest. Balances are mutated exclusively
/// through [`Account::credit`] and [`Account::debit`].
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,
    /// Unique display name
    pub username: String,
    /// SHA-256 hex digest of the credential
    pub credential_hash: String,
    /// Contact address, carried for the collaborator
    pub email: String,
    /// Current balance
    pub balance: Amount,
    /// Keypair for sealing short strings
    pub keypair: Keypair,
    /// Ordered inbox of delivered messages (unbounded, known limitation)
    pub mailbox: Vec<String>,
}

impl Account {
    /// Create an account at registration time
    pub fn new(
        id: AccountId,
        username: impl Into<String>,
        credential_hash: impl Into<String>,
        email: impl Into<String>,
        keypair: Keypair,
        opening_balance: Amount,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            credential_hash: credential_hash.into(),
            email: email.into(),
            balance: opening_balance,
            keypair,
            mailbox: Vec::new(),
        }
    }

    /// Add to the balance
    pub fn credit(&mut self, amount: Amount) -> StateResult<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(StateError::BalanceOverflow {
                balance: self.balance,
                amount,
            })?;
        Ok(())
    }

    /// Subtract from the balance
    ///
    /// Fails with `InsufficientFunds` and leaves the balance untouched
    /// when the amount exceeds it.
    pub fn debit(&mut self, amount: Amount) -> StateResult<()> {
        if amount > self.balance {
            return Err(StateError::InsufficientFunds {
                required: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Append a message to the inbox
    pub fn deliver(&mut self, message: impl Into<String>) {
        self.mailbox.push(message.into());
    }

    /// Snapshot for the collaborator's wire format
    pub fn to_record(&self) -> AccountRecord {
        AccountRecord {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            balance: self.balance,
            public_key: self.keypair.public_key_hex(),
            mailbox: self.mailbox.clone(),
        }
    }
}

/// Serializable account view, secret key excluded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub balance: Amount,
    pub public_key: String,
    pub mailbox: Vec<String>,
}

/// SHA-256 hex digest of a credential string
pub fn hash_credential(credential: &str) -> String {
    hex::encode(Sha256::digest(credential.as_bytes()))
}
