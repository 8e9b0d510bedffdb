//! redb-based saved-account registry
//!
//! A small capped list of previously-used identities backing the
//! account-switcher UI. The whole list is persisted under a single
//! well-known key as a JSON array, sorted by last-used descending.
//! Non-premium callers are capped at [`FREE_ACCOUNT_LIMIT`] entries;
//! premium callers are unbounded.
//!
//! Corrupt or unreadable stored data is treated as an empty list, never
//! surfaced as an error.

use redb::{Database, ReadableDatabase, TableDefinition};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table holding the account list: key = well-known key, value = JSON array
const ACCOUNTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("saved_accounts");

/// The single key the list is stored under
const ACCOUNTS_KEY: &str = "accounts";

/// Maximum saved accounts for non-premium callers
pub const FREE_ACCOUNT_LIMIT: usize = 3;

/// A previously-used identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedAccount {
    pub user_id: String,
    pub email: String,
    pub username: String,
    /// Epoch milliseconds of last use
    pub last_used: i64,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Account limit reached: free accounts can keep at most {FREE_ACCOUNT_LIMIT} saved accounts")]
    CapacityReached,
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Saved-account store backed by redb
#[derive(Clone)]
pub struct AccountRegistry {
    db: Arc<Database>,
}

impl AccountRegistry {
    /// Open or create the registry database at the given path
    pub fn open(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACCOUNTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory registry (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> RegistryResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACCOUNTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// List saved accounts, newest-used first
    pub fn list_saved_accounts(&self) -> RegistryResult<Vec<SavedAccount>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACCOUNTS_TABLE)?;
        let Some(guard) = table.get(ACCOUNTS_KEY)? else {
            return Ok(Vec::new());
        };
        // Corrupt stored data reads as an empty list
        let accounts = match serde_json::from_slice::<Vec<SavedAccount>>(guard.value()) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(error = %e, "Corrupt saved-account data, treating as empty");
                Vec::new()
            }
        };
        Ok(accounts)
    }

    /// Save or refresh an account.
    ///
    /// Updates in place if the user id is already present; otherwise
    /// appends, subject to the non-premium capacity cap. The list is
    /// re-sorted by last-used descending after every mutation.
    pub fn save_account(
        &self,
        user_id: &str,
        email: &str,
        username: &str,
        is_premium: bool,
    ) -> RegistryResult<()> {
        let mut accounts = self.list_saved_accounts()?;
        let now = shared::util::now_millis();

        if let Some(existing) = accounts.iter_mut().find(|a| a.user_id == user_id) {
            existing.email = email.to_string();
            existing.username = username.to_string();
            existing.last_used = now;
        } else {
            if !is_premium && accounts.len() >= FREE_ACCOUNT_LIMIT {
                return Err(RegistryError::CapacityReached);
            }
            accounts.push(SavedAccount {
                user_id: user_id.to_string(),
                email: email.to_string(),
                username: username.to_string(),
                last_used: now,
            });
        }

        accounts.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        self.persist(&accounts)
    }

    /// Remove an account. Succeeds whether or not it was present.
    pub fn remove_account(&self, user_id: &str) -> RegistryResult<()> {
        let mut accounts = self.list_saved_accounts()?;
        accounts.retain(|a| a.user_id != user_id);
        self.persist(&accounts)
    }

    /// Truncate to the capacity cap for a caller that is no longer
    /// premium, discarding the least-recently-used entries.
    pub fn prune_if_over_capacity(&self, is_premium: bool) -> RegistryResult<()> {
        if is_premium {
            return Ok(());
        }
        let mut accounts = self.list_saved_accounts()?;
        if accounts.len() <= FREE_ACCOUNT_LIMIT {
            return Ok(());
        }
        accounts.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        accounts.truncate(FREE_ACCOUNT_LIMIT);
        self.persist(&accounts)
    }

    fn persist(&self, accounts: &[SavedAccount]) -> RegistryResult<()> {
        let json = serde_json::to_vec(accounts)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ACCOUNTS_TABLE)?;
            table.insert(ACCOUNTS_KEY, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_lists_nothing() {
        let registry = AccountRegistry::open_in_memory().unwrap();
        assert!(registry.list_saved_accounts().unwrap().is_empty());
    }

    #[test]
    fn save_and_list_newest_first() {
        let registry = AccountRegistry::open_in_memory().unwrap();
        registry.save_account("u1", "a@example.com", "alice", false).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        registry.save_account("u2", "b@example.com", "bob", false).unwrap();
        // Refresh u1 so it becomes most recent
        std::thread::sleep(std::time::Duration::from_millis(2));
        registry.save_account("u1", "a@example.com", "alice", false).unwrap();

        let accounts = registry.list_saved_accounts().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].user_id, "u1");
        assert!(accounts[0].last_used >= accounts[1].last_used);
    }

    #[test]
    fn update_in_place_does_not_consume_capacity() {
        let registry = AccountRegistry::open_in_memory().unwrap();
        for i in 0..3 {
            registry
                .save_account(&format!("u{i}"), "x@example.com", "x", false)
                .unwrap();
        }
        // Updating an existing account still succeeds at capacity
        registry.save_account("u0", "new@example.com", "x", false).unwrap();
        let accounts = registry.list_saved_accounts().unwrap();
        assert_eq!(accounts.len(), 3);
        assert!(accounts.iter().any(|a| a.email == "new@example.com"));
    }

    #[test]
    fn fourth_account_hits_capacity_for_free() {
        let registry = AccountRegistry::open_in_memory().unwrap();
        for i in 0..3 {
            registry
                .save_account(&format!("u{i}"), "x@example.com", "x", false)
                .unwrap();
        }
        let err = registry
            .save_account("u3", "x@example.com", "x", false)
            .unwrap_err();
        assert!(matches!(err, RegistryError::CapacityReached));
        assert_eq!(registry.list_saved_accounts().unwrap().len(), 3);
    }

    #[test]
    fn premium_is_unbounded() {
        let registry = AccountRegistry::open_in_memory().unwrap();
        for i in 0..6 {
            registry
                .save_account(&format!("u{i}"), "x@example.com", "x", true)
                .unwrap();
        }
        assert_eq!(registry.list_saved_accounts().unwrap().len(), 6);
    }

    #[test]
    fn remove_is_idempotent() {
        let registry = AccountRegistry::open_in_memory().unwrap();
        registry.save_account("u1", "a@example.com", "alice", false).unwrap();
        registry.remove_account("u1").unwrap();
        registry.remove_account("u1").unwrap();
        assert!(registry.list_saved_accounts().unwrap().is_empty());
    }

    #[test]
    fn prune_keeps_three_most_recent() {
        let registry = AccountRegistry::open_in_memory().unwrap();
        for i in 0..5 {
            registry
                .save_account(&format!("u{i}"), "x@example.com", "x", true)
                .unwrap();
        }
        registry.prune_if_over_capacity(false).unwrap();
        let accounts = registry.list_saved_accounts().unwrap();
        assert_eq!(accounts.len(), 3);
        // Premium callers are never pruned
        registry.save_account("u9", "x@example.com", "x", true).unwrap();
        registry.prune_if_over_capacity(true).unwrap();
        assert_eq!(registry.list_saved_accounts().unwrap().len(), 4);
    }

    #[test]
    fn corrupt_data_reads_as_empty() {
        let registry = AccountRegistry::open_in_memory().unwrap();
        // Write garbage under the well-known key
        let write_txn = registry.db.begin_write().unwrap();
        {
            let mut table = write_txn.open_table(ACCOUNTS_TABLE).unwrap();
            table.insert(ACCOUNTS_KEY, b"not json".as_slice()).unwrap();
        }
        write_txn.commit().unwrap();

        assert!(registry.list_saved_accounts().unwrap().is_empty());
        // And the registry remains usable
        registry.save_account("u1", "a@example.com", "alice", false).unwrap();
        assert_eq!(registry.list_saved_accounts().unwrap().len(), 1);
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.redb");
        {
            let registry = AccountRegistry::open(&path).unwrap();
            registry.save_account("u1", "a@example.com", "alice", false).unwrap();
        }
        let registry = AccountRegistry::open(&path).unwrap();
        let accounts = registry.list_saved_accounts().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].username, "alice");
    }
}
