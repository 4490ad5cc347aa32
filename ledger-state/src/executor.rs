//! Transaction execution
//!
//! Execution never propagates its failures: a transaction that misses
//! its precondition becomes an inert outcome, is logged, and is still
//! recorded in the eventual block.

use crate::{AccountHandle, Directory, StateError};
use ledger_core::{Transaction, TxKind};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of executing a single transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// State changes were applied
    Applied,
    /// Precondition failed; no state change, transaction recorded anyway
    Inert(StateError),
}

impl ExecutionOutcome {
    /// Check whether state changes were applied
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Execute a transaction against live account state
pub fn execute(tx: &Transaction, directory: &Directory) -> ExecutionOutcome {
    let result = match tx.kind {
        TxKind::Send => execute_send(tx, directory),
        TxKind::ContractCall => {
            // Reserved extension point: deliberately a no-op
            debug!(sender = %tx.sender_name, "contract call accepted as no-op");
            Ok(())
        }
        TxKind::SignedMessage => execute_signed_message(tx, directory),
    };

    match result {
        Ok(()) => {
            info!(
                kind = ?tx.kind,
                sender = %tx.sender_name,
                receiver = %tx.receiver_name,
                value = tx.value,
                "transaction applied"
            );
            ExecutionOutcome::Applied
        }
        Err(reason) => {
            warn!(
                kind = ?tx.kind,
                sender = %tx.sender_name,
                receiver = %tx.receiver_name,
                %reason,
                "transaction left inert"
            );
            ExecutionOutcome::Inert(reason)
        }
    }
}

fn resolve(directory: &Directory, username: &str) -> Result<AccountHandle, StateError> {
    directory
        .get(username)
        .ok_or_else(|| StateError::UnknownAccount(username.to_string()))
}

/// Value transfer: debit and credit happen under both account locks as
/// one indivisible step. Locks are taken in account-id order so two
/// transfers touching the same pair cannot deadlock.
fn execute_send(tx: &Transaction, directory: &Directory) -> Result<(), StateError> {
    if tx.value == 0 {
        return Err(StateError::InvalidTransactionValue { value: tx.value });
    }

    let sender = resolve(directory, &tx.sender_name)?;
    let receiver = resolve(directory, &tx.receiver_name)?;

    if Arc::ptr_eq(&sender, &receiver) {
        let mut account = sender.lock();
        account.debit(tx.value)?;
        account.credit(tx.value)?;
        return Ok(());
    }

    let sender_id = sender.lock().id;
    let receiver_id = receiver.lock().id;

    let (mut first, mut second) = if sender_id < receiver_id {
        (sender.lock(), receiver.lock())
    } else {
        (receiver.lock(), sender.lock())
    };
    let (sender_guard, receiver_guard) = if sender_id < receiver_id {
        (&mut first, &mut second)
    } else {
        (&mut second, &mut first)
    };

    sender_guard.debit(tx.value)?;
    if let Err(overflow) = receiver_guard.credit(tx.value) {
        // Put the debit back; restoring below the prior balance cannot fail
        let _ = sender_guard.credit(tx.value);
        return Err(overflow);
    }
    Ok(())
}

/// Message delivery annotated with the sender's public key; no
/// signature is verified.
fn execute_signed_message(tx: &Transaction, directory: &Directory) -> Result<(), StateError> {
    let sender = resolve(directory, &tx.sender_name)?;
    let receiver = resolve(directory, &tx.receiver_name)?;

    let public_key = sender.lock().keypair.public_key_hex();
    let note = format!("\"{} Sent by: {}\"", tx.message, public_key);
    receiver.lock().deliver(note);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Keypair;
    use ledger_core::Amount;

    fn directory_with(accounts: &[(&str, Amount)]) -> Directory {
        let directory = Directory::new();
        for (name, balance) in accounts {
            directory
                .create_account(name, "pw", "x@test.com", Keypair::generate(), *balance)
                .unwrap();
        }
        directory
    }

    fn balance_of(directory: &Directory, name: &str) -> Amount {
        directory.get(name).unwrap().lock().balance
    }

    #[test]
    fn test_send_moves_value() {
        let directory = directory_with(&[("alice", 10), ("bob", 10)]);
        let tx = Transaction::send("alice", "bob", 5);

        assert_eq!(execute(&tx, &directory), ExecutionOutcome::Applied);
        assert_eq!(balance_of(&directory, "alice"), 5);
        assert_eq!(balance_of(&directory, "bob"), 15);
    }

    #[test]
    fn test_send_beyond_balance_is_inert() {
        let directory = directory_with(&[("alice", 10), ("bob", 10)]);
        let tx = Transaction::send("bob", "alice", 20);

        let outcome = execute(&tx, &directory);
        assert_eq!(
            outcome,
            ExecutionOutcome::Inert(StateError::InsufficientFunds {
                required: 20,
                available: 10,
            })
        );
        // No balance change on either side
        assert_eq!(balance_of(&directory, "alice"), 10);
        assert_eq!(balance_of(&directory, "bob"), 10);
    }

    #[test]
    fn test_zero_value_send_is_inert() {
        let directory = directory_with(&[("alice", 10), ("bob", 10)]);
        let tx = Transaction::send("alice", "bob", 0);

        assert_eq!(
            execute(&tx, &directory),
            ExecutionOutcome::Inert(StateError::InvalidTransactionValue { value: 0 })
        );
        assert_eq!(balance_of(&directory, "alice"), 10);
    }

    #[test]
    fn test_unknown_account_is_inert() {
        let directory = directory_with(&[("alice", 10)]);
        let tx = Transaction::send("alice", "nobody", 5);

        assert_eq!(
            execute(&tx, &directory),
            ExecutionOutcome::Inert(StateError::UnknownAccount("nobody".to_string()))
        );
        assert_eq!(balance_of(&directory, "alice"), 10);
    }

    #[test]
    fn test_self_send_is_net_zero() {
        let directory = directory_with(&[("alice", 10)]);
        let tx = Transaction::send("alice", "alice", 5);

        assert_eq!(execute(&tx, &directory), ExecutionOutcome::Applied);
        assert_eq!(balance_of(&directory, "alice"), 10);
    }

    #[test]
    fn test_signed_message_delivery() {
        let directory = directory_with(&[("alice", 0), ("bob", 0)]);
        let tx = Transaction::signed_message("alice", "bob", "hello bob");

        assert_eq!(execute(&tx, &directory), ExecutionOutcome::Applied);

        let sender_key = directory
            .get("alice")
            .unwrap()
            .lock()
            .keypair
            .public_key_hex();
        let mailbox = directory.get("bob").unwrap().lock().mailbox.clone();
        assert_eq!(
            mailbox,
            vec![format!("\"hello bob Sent by: {sender_key}\"")]
        );
    }

    #[test]
    fn test_contract_call_changes_nothing() {
        let directory = directory_with(&[("alice", 10), ("bob", 10)]);
        let tx = Transaction::contract_call("alice", "bob", vec![1, 2, 3]);

        assert_eq!(execute(&tx, &directory), ExecutionOutcome::Applied);
        assert_eq!(balance_of(&directory, "alice"), 10);
        assert_eq!(balance_of(&directory, "bob"), 10);
        assert!(directory.get("bob").unwrap().lock().mailbox.is_empty());
    }
}
