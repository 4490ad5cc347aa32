//! Core ledger data structures
//!
//! This crate provides the immutable half of the ledger:
//! - Basic types (Hash, BlockNumber, Timestamp, etc.)
//! - Transaction and Block structures
//! - Chain integrity verification

pub mod block;
pub mod error;
pub mod transaction;
pub mod types;
pub mod verify;

// Re-export commonly used types
pub use block::*;
pub use error::*;
pub use transaction::*;
pub use types::*;
pub use verify::*;
