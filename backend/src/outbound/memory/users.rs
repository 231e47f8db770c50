//! `UserRepository` over a process-local map.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, User, UserAccount, UserId};

fn poisoned() -> UserPersistenceError {
    UserPersistenceError::query("user store lock poisoned")
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    accounts: RwLock<HashMap<UserId, UserAccount>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_needle(user: &User, needle: &str) -> bool {
    user.username().as_ref().to_lowercase().contains(needle) || user.email().as_ref().contains(needle)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;
        let username = account.user.username().as_ref().to_lowercase();

        for existing in accounts.values() {
            if existing.user.email() == account.user.email() {
                return Err(UserPersistenceError::conflict("email already registered"));
            }
            if existing.user.username().as_ref().to_lowercase() == username {
                return Err(UserPersistenceError::conflict("username already taken"));
            }
        }
        accounts.insert(account.user.id().clone(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        Ok(accounts.get(id).map(|account| account.user.clone()))
    }

    async fn find_account_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        Ok(accounts
            .values()
            .find(|account| account.user.email() == email)
            .cloned())
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        Ok(ids
            .iter()
            .filter_map(|id| accounts.get(id).map(|account| account.user.clone()))
            .collect())
    }

    async fn search(
        &self,
        needle: &str,
        exclude: &UserId,
        limit: usize,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let needle = needle.to_lowercase();
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        let mut found: Vec<User> = accounts
            .values()
            .map(|account| &account.user)
            .filter(|user| user.id() != exclude && matches_needle(user, &needle))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.username().as_ref().cmp(b.username().as_ref()));
        found.truncate(limit);
        Ok(found)
    }
}
