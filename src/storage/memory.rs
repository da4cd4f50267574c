// In-memory account storage
// Emails are matched case-insensitively

use super::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Default)]
struct Accounts {
    by_id: HashMap<String, Account>,
    email_index: HashMap<String, String>,
}

pub struct MemoryAccountStorage {
    accounts: Arc<RwLock<Accounts>>,
}

impl MemoryAccountStorage {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(Accounts::default())),
        }
    }
}

impl Default for MemoryAccountStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl AccountStorage for MemoryAccountStorage {
    async fn create_account(&self, account: Account) -> Result<(), StorageError> {
        let mut accounts = self.accounts.write().await;

        let key = email_key(&account.email);
        if accounts.email_index.contains_key(&key) {
            return Err(StorageError::AlreadyExists);
        }

        info!("Creating account {} with role {}", account.id, account.role);
        accounts.email_index.insert(key, account.id.clone());
        accounts.by_id.insert(account.id.clone(), account);
        Ok(())
    }

    async fn get_account(&self, id: &str) -> Result<Option<Account>, StorageError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.by_id.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StorageError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .email_index
            .get(&email_key(email))
            .and_then(|id| accounts.by_id.get(id))
            .cloned())
    }

    async fn count_accounts(&self) -> Result<usize, StorageError> {
        Ok(self.accounts.read().await.by_id.len())
    }
}
