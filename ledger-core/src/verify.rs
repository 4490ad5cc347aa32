//! Chain integrity verification

use crate::{Block, Gas, Hash};
use thiserror::Error;

/// The individual check a block failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FaultKind {
    #[error("parent root {found} does not match previous block hash {expected}")]
    ParentMismatch { expected: Hash, found: Hash },

    #[error("stored hash {stored} does not match recomputed hash {computed}")]
    HashMismatch { stored: Hash, computed: Hash },

    #[error("gas used {used} exceeds gas limit {limit}")]
    GasOverrun { used: Gas, limit: Gas },

    #[error("hashing failed: {0}")]
    Hashing(String),
}

/// First failing block index plus the check it failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("block {index}: {kind}")]
pub struct ChainFault {
    /// Index of the first failing block in the chain
    pub index: usize,
    /// The failed check
    pub kind: FaultKind,
}

/// Walk the chain from genesis and validate hash linkage and payload
/// invariants on every subsequent block.
///
/// For each block after genesis this checks, in order: parent linkage
/// against the previous block's stored hash, reproducibility of the
/// stored hash from the stored fields, and gas used against the gas
/// limit. The first failure wins.
pub fn verify_blocks(blocks: &[Block]) -> Result<(), ChainFault> {
    for (index, window) in blocks.windows(2).enumerate() {
        let (previous, block) = (&window[0], &window[1]);
        let index = index + 1;

        if block.parent_root != previous.hash {
            return Err(ChainFault {
                index,
                kind: FaultKind::ParentMismatch {
                    expected: previous.hash,
                    found: block.parent_root,
                },
            });
        }

        let computed = block.compute_hash().map_err(|e| ChainFault {
            index,
            kind: FaultKind::Hashing(e.to_string()),
        })?;
        if computed != block.hash {
            return Err(ChainFault {
                index,
                kind: FaultKind::HashMismatch {
                    stored: block.hash,
                    computed,
                },
            });
        }

        let payload = &block.body.execution_payload;
        if payload.gas_used > payload.gas_limit {
            return Err(ChainFault {
                index,
                kind: FaultKind::GasOverrun {
                    used: payload.gas_used,
                    limit: payload.gas_limit,
                },
            });
        }
    }

    Ok(())
}

/// Boolean convenience wrapper over [`verify_blocks`]
pub fn chain_is_valid(blocks: &[Block]) -> bool {
    verify_blocks(blocks).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Transaction, BLOCK_GAS_LIMIT};

    fn sealed_child(parent: &Block, number: u64) -> Block {
        Block::seal(
            parent.hash,
            Hash::new([9u8; 32]),
            "Block",
            vec![Transaction::send("alice", "bob", 1)],
            number,
            1000,
            1_700_000_000_000 + number,
        )
        .unwrap()
    }

    fn linked_chain(len: u64) -> Vec<Block> {
        let mut chain = vec![Block::genesis().unwrap()];
        for number in 1..len {
            let child = sealed_child(chain.last().unwrap(), number);
            chain.push(child);
        }
        chain
    }

    #[test]
    fn test_genesis_only_chain_is_valid() {
        let chain = vec![Block::genesis().unwrap()];
        assert!(verify_blocks(&chain).is_ok());
        assert!(chain_is_valid(&chain));
    }

    #[test]
    fn test_linked_chain_is_valid() {
        let chain = linked_chain(5);
        for i in 1..chain.len() {
            assert_eq!(chain[i].parent_root, chain[i - 1].hash);
        }
        assert!(verify_blocks(&chain).is_ok());
    }

    #[test]
    fn test_tampered_block_is_detected() {
        let mut chain = linked_chain(4);
        chain[2].body.execution_payload.gas_used = 42;

        let fault = verify_blocks(&chain).unwrap_err();
        assert_eq!(fault.index, 2);
        assert!(matches!(fault.kind, FaultKind::HashMismatch { .. }));
        assert!(!chain_is_valid(&chain));
    }

    #[test]
    fn test_broken_parent_link_is_detected() {
        let mut chain = linked_chain(3);
        let orphan = Block::seal(
            Hash::new([8u8; 32]),
            Hash::zero(),
            "Block",
            Vec::new(),
            2,
            0,
            7,
        )
        .unwrap();
        chain[2] = orphan;

        let fault = verify_blocks(&chain).unwrap_err();
        assert_eq!(fault.index, 2);
        assert!(matches!(fault.kind, FaultKind::ParentMismatch { .. }));
    }

    #[test]
    fn test_gas_overrun_is_detected() {
        let genesis = Block::genesis().unwrap();
        let greedy = Block::seal(
            genesis.hash,
            Hash::zero(),
            "Block",
            Vec::new(),
            1,
            BLOCK_GAS_LIMIT + 1,
            7,
        )
        .unwrap();
        let chain = vec![genesis, greedy];

        let fault = verify_blocks(&chain).unwrap_err();
        assert_eq!(fault.index, 1);
        assert_eq!(
            fault.kind,
            FaultKind::GasOverrun {
                used: BLOCK_GAS_LIMIT + 1,
                limit: BLOCK_GAS_LIMIT,
            }
        );
    }
}
