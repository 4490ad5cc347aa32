//! State error types

use ledger_core::{Amount, CoreError};
use thiserror::Error;

/// State error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Debit larger than the available balance
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Amount, available: Amount },

    /// Non-positive value on a `Send`
    #[error("Invalid transaction value: {value}")]
    InvalidTransactionValue { value: Amount },

    /// Credit would overflow the balance type
    #[error("Balance overflow crediting {amount} onto {balance}")]
    BalanceOverflow { balance: Amount, amount: Amount },

    /// Referenced account does not exist
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    /// Display name already registered
    #[error("Duplicate account name: {0}")]
    DuplicateAccount(String),

    /// Keypair operation failed
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Error bubbled up from the core crate
    #[error("Core error: {0}")]
    Core(String),
}

impl From<CoreError> for StateError {
    fn from(err: CoreError) -> Self {
        StateError::Core(err.to_string())
    }
}

/// Result type for state operations
pub type StateResult<T> = Result<T, StateError>;
