//! Process-local user repository used when no database is configured.
//!
//! All state sits behind one mutex, so the uniqueness check and the insert of
//! a record happen in a single critical section.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::password::PasswordHash;
use crate::domain::ports::{UserPersistenceError, UserRecord, UserRepository};
use crate::domain::{EmailAddress, User, UserId, Username};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, UserRecord>,
    by_username: HashMap<String, UserId>,
    by_email: HashMap<String, UserId>,
}

impl Tables {
    fn lookup(&self, index: &HashMap<String, UserId>, key: &str) -> Option<UserRecord> {
        index.get(key).and_then(|id| self.users.get(id)).cloned()
    }
}

/// In-memory [`UserRepository`]; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    tables: Mutex<Tables>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.tables.lock().map(|tables| tables.users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, UserPersistenceError> {
        self.tables
            .lock()
            .map_err(|_| UserPersistenceError::query("in-memory user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, record: &UserRecord) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables()?;
        let user: &User = record.user();
        let username = user.username().as_ref().to_owned();
        let email = user.email().as_ref().to_owned();
        if tables.by_username.contains_key(&username) {
            return Err(UserPersistenceError::duplicate_username());
        }
        if tables.by_email.contains_key(&email) {
            return Err(UserPersistenceError::duplicate_email());
        }
        let id = *user.id();
        tables.by_username.insert(username, id);
        tables.by_email.insert(email, id);
        tables.users.insert(id, record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, UserPersistenceError> {
        Ok(self.tables()?.users.get(id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserRecord>, UserPersistenceError> {
        let tables = self.tables()?;
        Ok(tables.lookup(&tables.by_username, username.as_ref()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserRecord>, UserPersistenceError> {
        let tables = self.tables()?;
        Ok(tables.lookup(&tables.by_email, email.as_ref()))
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables()?;
        let record = tables
            .users
            .get_mut(id)
            .ok_or_else(UserPersistenceError::not_found)?;
        *record = UserRecord::new(record.user().clone(), password_hash.clone());
        Ok(())
    }
}
