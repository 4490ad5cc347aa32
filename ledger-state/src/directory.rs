//! Shared account registry
//!
//! Each account sits behind its own lock so transaction execution can
//! take exactly the accounts it touches. Lock ordering is by account
//! id (see the executor), which is why the registry hands out handles
//! rather than guards.

use crate::{hash_credential, Account, AccountId, Keypair, StateError, StateResult};
use ledger_core::Amount;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Shared, individually locked account
pub type AccountHandle = Arc<Mutex<Account>>;

/// Registry of all accounts known to the ledger
#[derive(Default)]
pub struct Directory {
    inner: RwLock<DirectoryInner>,
}

#[derive(Default)]
struct DirectoryInner {
    by_id: BTreeMap<AccountId, AccountHandle>,
    by_name: HashMap<String, AccountId>,
    next_id: AccountId,
}

impl Directory {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new account
    ///
    /// The collaborator supplies the keypair and the opening balance;
    /// the credential is stored as a SHA-256 digest. Display names are
    /// unique.
    pub fn create_account(
        &self,
        username: &str,
        credential: &str,
        email: &str,
        keypair: Keypair,
        opening_balance: Amount,
    ) -> StateResult<AccountHandle> {
        let mut inner = self.inner.write();

        if inner.by_name.contains_key(username) {
            return Err(StateError::DuplicateAccount(username.to_string()));
        }

        inner.next_id += 1;
        let id = inner.next_id;

        let account = Account::new(
            id,
            username,
            hash_credential(credential),
            email,
            keypair,
            opening_balance,
        );
        let handle = Arc::new(Mutex::new(account));

        inner.by_id.insert(id, Arc::clone(&handle));
        inner.by_name.insert(username.to_string(), id);

        debug!(id, username, opening_balance, "account registered");
        Ok(handle)
    }

    /// Look up an account by display name
    pub fn get(&self, username: &str) -> Option<AccountHandle> {
        let inner = self.inner.read();
        let id = inner.by_name.get(username)?;
        inner.by_id.get(id).map(Arc::clone)
    }

    /// Look up an account by id
    pub fn get_by_id(&self, id: AccountId) -> Option<AccountHandle> {
        self.inner.read().by_id.get(&id).map(Arc::clone)
    }

    /// Cloned snapshot of every account, ordered by id
    pub fn list(&self) -> Vec<Account> {
        self.inner
            .read()
            .by_id
            .values()
            .map(|handle| handle.lock().clone())
            .collect()
    }

    /// Current display-name → balance mapping, ordered by name
    pub fn balances(&self) -> BTreeMap<String, Amount> {
        self.inner
            .read()
            .by_id
            .values()
            .map(|handle| {
                let account = handle.lock();
                (account.username.clone(), account.balance)
            })
            .collect()
    }

    /// Number of registered accounts
    pub fn len(&self) -> usize {
        self.inner.read().by_id.len()
    }

    /// Check whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().by_id.is_empty()
    }
}
