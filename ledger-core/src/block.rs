//! Block data structures and operations

use crate::{BlockNumber, CoreError, CoreResult, Gas, Hash, Timestamp, Transaction};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

/// Fixed gas limit applied to every sealed block
pub const BLOCK_GAS_LIMIT: Gas = 10_000;

/// Graffiti text carried by the genesis block
pub const GENESIS_GRAFFITI: &str = "Genesis";

/// Ordered batch of executed transactions plus its execution metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode)]
pub struct ExecutionPayload {
    /// Transactions in submission order
    pub transactions: Vec<Transaction>,
    /// Block number (height)
    pub block_number: BlockNumber,
    /// Gas consumed by the batch
    pub gas_used: Gas,
    /// Gas limit for the batch
    pub gas_limit: Gas,
    /// Seal timestamp in milliseconds
    pub timestamp: Timestamp,
}

/// Block body: free-text annotation plus the execution payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode)]
pub struct Body {
    /// Free-form annotation text
    pub graffiti: String,
    /// Executed transaction batch
    pub execution_payload: ExecutionPayload,
}

/// Immutable, hash-addressed container for a sealed transaction batch
///
/// The hash is computed once at construction. `compute_hash` is a pure
/// function of the stored fields, so a verifier can recompute it later
/// and expect byte-identical output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode)]
pub struct Block {
    /// Hash of the parent block
    pub parent_root: Hash,
    /// Digest of the global balance snapshot at seal time
    pub state_root: Hash,
    /// Block body
    pub body: Body,
    /// Hash captured at construction time
    pub hash: Hash,
}

impl Block {
    /// Seal a new block over an executed transaction batch
    pub fn seal(
        parent_root: Hash,
        state_root: Hash,
        graffiti: impl Into<String>,
        transactions: Vec<Transaction>,
        block_number: BlockNumber,
        gas_used: Gas,
        timestamp: Timestamp,
    ) -> CoreResult<Self> {
        let body = Body {
            graffiti: graffiti.into(),
            execution_payload: ExecutionPayload {
                transactions,
                block_number,
                gas_used,
                gas_limit: BLOCK_GAS_LIMIT,
                timestamp,
            },
        };

        let mut block = Self {
            parent_root,
            state_root,
            body,
            hash: Hash::zero(),
        };
        block.hash = block.compute_hash()?;
        Ok(block)
    }

    /// The genesis sentinel: zero roots, empty payload, timestamp 0
    pub fn genesis() -> CoreResult<Self> {
        Self::seal(
            Hash::zero(),
            Hash::zero(),
            GENESIS_GRAFFITI,
            Vec::new(),
            0,
            0,
            0,
        )
    }

    /// Recompute the block hash from the stored fields
    ///
    /// Covers parent root, state root, graffiti, transaction list,
    /// block number, gas used and timestamp. The stored hash itself
    /// (and the constant gas limit) stay outside the digest.
    pub fn compute_hash(&self) -> CoreResult<Hash> {
        let payload = &self.body.execution_payload;
        let encoded = bincode::encode_to_vec(
            (
                &self.parent_root,
                &self.state_root,
                &self.body.graffiti,
                &payload.transactions,
                payload.block_number,
                payload.gas_used,
                payload.timestamp,
            ),
            bincode::config::standard(),
        )
        .map_err(|e| CoreError::Bincode(e.to_string()))?;

        let hash_bytes = Keccak256::digest(&encoded);
        Ok(Hash::from_slice(hash_bytes.as_slice()))
    }

    /// Block number (height)
    pub fn number(&self) -> BlockNumber {
        self.body.execution_payload.block_number
    }

    /// Transactions sealed into this block
    pub fn transactions(&self) -> &[Transaction] {
        &self.body.execution_payload.transactions
    }

    /// Check if this is the genesis block
    pub fn is_genesis(&self) -> bool {
        self.number() == 0 && self.parent_root == Hash::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Transaction;

    #[test]
    fn test_genesis_block() {
        let genesis = Block::genesis().unwrap();
        assert_eq!(genesis.number(), 0);
        assert_eq!(genesis.parent_root, Hash::zero());
        assert_eq!(genesis.state_root, Hash::zero());
        assert_eq!(genesis.body.graffiti, GENESIS_GRAFFITI);
        assert!(genesis.transactions().is_empty());
        assert!(genesis.is_genesis());
    }

    #[test]
    fn test_block_hash_deterministic() {
        let genesis = Block::genesis().unwrap();
        assert_eq!(genesis.hash, genesis.compute_hash().unwrap());
        assert_eq!(genesis.compute_hash().unwrap(), genesis.compute_hash().unwrap());
    }

    #[test]
    fn test_sealed_block_hash_covers_fields() {
        let txs = vec![Transaction::send("alice", "bob", 5)];
        let block = Block::seal(
            Hash::new([1u8; 32]),
            Hash::new([2u8; 32]),
            "Block",
            txs,
            1,
            1000,
            1_700_000_000_000,
        )
        .unwrap();

        assert_eq!(block.hash, block.compute_hash().unwrap());

        // Any stored field feeding the digest changes the recomputed hash
        let mut tampered = block.clone();
        tampered.body.execution_payload.gas_used = 999;
        assert_ne!(tampered.compute_hash().unwrap(), tampered.hash);

        let mut tampered = block.clone();
        tampered.body.graffiti = "forged".to_string();
        assert_ne!(tampered.compute_hash().unwrap(), tampered.hash);

        let mut tampered = block;
        tampered.body.execution_payload.timestamp += 1;
        assert_ne!(tampered.compute_hash().unwrap(), tampered.hash);
    }

    #[test]
    fn test_canonical_round_trip_preserves_hash() {
        let txs = vec![
            Transaction::send("alice", "bob", 5),
            Transaction::signed_message("bob", "alice", "hi"),
        ];
        let block = Block::seal(
            Hash::new([3u8; 32]),
            Hash::new([4u8; 32]),
            "Block",
            txs,
            2,
            1000,
            1_700_000_000_123,
        )
        .unwrap();

        let json = serde_json::to_string(&block).unwrap();
        let back: Block = serde_json::from_str(&json).unwrap();

        assert_eq!(back, block);
        assert_eq!(back.compute_hash().unwrap(), block.hash);
    }
}
