//! The ledger: chain, pending buffer and batch sealing

use crate::{executor, Directory, ExecutionOutcome, StateResult};
use ledger_core::{chain_is_valid, verify_blocks, Amount, Block, ChainFault, Gas, Hash, Timestamp, Transaction};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Ledger construction parameters
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Transactions per sealed block
    pub batch_threshold: usize,
    /// Annotation text stamped into every sealed block
    pub graffiti: String,
    /// Flat gas charged per recorded transaction
    pub tx_gas: Gas,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            batch_threshold: 2,
            graffiti: "Block".to_string(),
            tx_gas: 500,
        }
    }
}

/// Append-only chain of sealed blocks plus the pending buffer
///
/// The balance snapshot held here only feeds the state-root digest;
/// authoritative balances live on the accounts themselves.
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    state: BTreeMap<String, Amount>,
    config: LedgerConfig,
}

impl Ledger {
    /// Create a ledger holding only the genesis block
    pub fn new(config: LedgerConfig) -> StateResult<Self> {
        Ok(Self {
            chain: vec![Block::genesis()?],
            pending: Vec::new(),
            state: BTreeMap::new(),
            config,
        })
    }

    /// The chain tip
    pub fn latest_block(&self) -> &Block {
        // chain[0] is genesis and blocks are only ever appended
        self.chain.last().expect("chain always holds genesis")
    }

    /// All sealed blocks, genesis first
    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    /// Transactions waiting for the next seal
    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Register a balance in the snapshot feeding the state root
    pub fn track_account(&mut self, username: impl Into<String>, balance: Amount) {
        self.state.insert(username.into(), balance);
    }

    /// Execute a transaction, buffer it, and seal a block once the
    /// batch threshold is reached
    ///
    /// The transaction is recorded whether or not execution applied;
    /// a failed precondition is returned as an inert outcome, never as
    /// an error.
    pub fn add_transaction(
        &mut self,
        tx: Transaction,
        directory: &Directory,
    ) -> StateResult<ExecutionOutcome> {
        let outcome = executor::execute(&tx, directory);
        self.refresh_snapshot(&tx, directory);

        self.pending.push(tx);
        debug!(pending = self.pending.len(), "transaction buffered");

        if self.pending.len() >= self.config.batch_threshold {
            let block = self.seal_pending()?;
            info!(
                number = block.number(),
                transactions = block.transactions().len(),
                hash = %block.hash,
                "block sealed"
            );
        }

        Ok(outcome)
    }

    /// Drain the pending buffer into a new block linked to the tip
    fn seal_pending(&mut self) -> StateResult<&Block> {
        let transactions = std::mem::take(&mut self.pending);
        let gas_used = transactions.len() as Gas * self.config.tx_gas;

        let block = Block::seal(
            self.latest_block().hash,
            self.state_root(),
            self.config.graffiti.clone(),
            transactions,
            self.chain.len() as u64,
            gas_used,
            now_millis(),
        )?;

        self.chain.push(block);
        Ok(self.latest_block())
    }

    /// Digest over the sorted balance snapshot
    pub fn state_root(&self) -> Hash {
        let mut hasher = blake3::Hasher::new();
        for (username, balance) in &self.state {
            hasher.update(&(username.len() as u64).to_le_bytes());
            hasher.update(username.as_bytes());
            hasher.update(&balance.to_le_bytes());
        }
        Hash::from_slice(hasher.finalize().as_bytes())
    }

    /// Walk the chain validating linkage and payload invariants
    pub fn verify(&self) -> Result<(), ChainFault> {
        verify_blocks(&self.chain)
    }

    /// Boolean form of [`Ledger::verify`]
    pub fn is_valid(&self) -> bool {
        chain_is_valid(&self.chain)
    }

    fn refresh_snapshot(&mut self, tx: &Transaction, directory: &Directory) {
        for username in [&tx.sender_name, &tx.receiver_name] {
            if let Some(handle) = directory.get(username) {
                let account = handle.lock();
                self.state.insert(account.username.clone(), account.balance);
            }
        }
    }
}

fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis() as Timestamp
}
