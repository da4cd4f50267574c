// Account storage for the development auth service

pub mod memory;

pub use memory::MemoryAccountStorage;

use crate::models::{Identity, IdentityPayload, Role, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn identity(&self) -> Identity {
        Identity {
            id: Some(UserId::new(self.id.clone())),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }

    pub fn payload(&self) -> IdentityPayload {
        IdentityPayload::from(&self.identity())
    }
}

#[async_trait]
pub trait AccountStorage: Send + Sync {
    /// Insert a new account; fails with `AlreadyExists` if the email is taken
    async fn create_account(&self, account: Account) -> Result<(), StorageError>;

    async fn get_account(&self, id: &str) -> Result<Option<Account>, StorageError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StorageError>;

    async fn count_accounts(&self) -> Result<usize, StorageError>;
}

/// Storage errors
#[derive(Debug, Clone)]
pub enum StorageError {
    AlreadyExists,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::AlreadyExists => write!(f, "Item already exists"),
        }
    }
}

impl std::error::Error for StorageError {}
