//! Shared ledger surface for the request-handling collaborator
//!
//! One instance is constructed at startup and handed to whatever layer
//! fields requests; there is no process-wide singleton. The ledger's
//! "execute, buffer, maybe seal" sequence runs under a single lock so
//! reaching the threshold and sealing is one indivisible step.

use crate::{
    Account, AccountHandle, Directory, ExecutionOutcome, Keypair, Ledger, LedgerConfig,
    StateResult,
};
use ledger_core::{Amount, Block, ChainFault, Transaction, TxKind};
use parking_lot::Mutex;
use std::sync::Arc;

/// Clonable handle over one ledger and its account registry
#[derive(Clone)]
pub struct SharedLedger {
    directory: Arc<Directory>,
    ledger: Arc<Mutex<Ledger>>,
}

impl SharedLedger {
    /// Construct a fresh ledger with an implicit genesis block
    pub fn new(config: LedgerConfig) -> StateResult<Self> {
        Ok(Self {
            directory: Arc::new(Directory::new()),
            ledger: Arc::new(Mutex::new(Ledger::new(config)?)),
        })
    }

    /// Register an account
    ///
    /// The keypair and opening balance come from the caller; the core
    /// invents neither.
    pub fn create_account(
        &self,
        username: &str,
        credential: &str,
        email: &str,
        keypair: Keypair,
        opening_balance: Amount,
    ) -> StateResult<AccountHandle> {
        let handle =
            self.directory
                .create_account(username, credential, email, keypair, opening_balance)?;

        self.ledger
            .lock()
            .track_account(username, opening_balance);
        Ok(handle)
    }

    /// Build a transaction, execute it and buffer it into the ledger
    pub fn submit_transaction(
        &self,
        kind: TxKind,
        sender: &str,
        receiver: &str,
        value: Amount,
        message: &str,
        data: Option<Vec<u8>>,
    ) -> StateResult<ExecutionOutcome> {
        let tx = Transaction::new(kind, sender, receiver, value, message, data);
        self.ledger.lock().add_transaction(tx, &self.directory)
    }

    /// Cloned snapshot of the chain, genesis first
    pub fn list_blocks(&self) -> Vec<Block> {
        self.ledger.lock().blocks().to_vec()
    }

    /// Cloned snapshot of every account, ordered by id
    pub fn list_accounts(&self) -> Vec<Account> {
        self.directory.list()
    }

    /// Structured chain-integrity check
    pub fn verify(&self) -> Result<(), ChainFault> {
        self.ledger.lock().verify()
    }

    /// Boolean chain-integrity check
    pub fn verify_chain(&self) -> bool {
        self.ledger.lock().is_valid()
    }

    /// The underlying account registry
    pub fn directory(&self) -> &Directory {
        &self.directory
    }
}
