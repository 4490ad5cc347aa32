//! Live account state and the ledger itself
//!
//! This crate provides the mutable half of the system: accounts and
//! their balances, transaction execution, and the ledger that batches
//! executed transactions into sealed blocks.

pub mod account;
pub mod directory;
pub mod error;
pub mod executor;
pub mod keypair;
pub mod ledger;
pub mod service;

pub use account::{hash_credential, Account, AccountId, AccountRecord};
pub use directory::{AccountHandle, Directory};
pub use error::{StateError, StateResult};
pub use executor::ExecutionOutcome;
pub use keypair::Keypair;
pub use ledger::{Ledger, LedgerConfig};
pub use service::SharedLedger;
