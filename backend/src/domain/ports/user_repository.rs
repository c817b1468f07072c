//! Driven port for persisting users together with their password hashes.

use async_trait::async_trait;

use crate::domain::password::PasswordHash;
use crate::domain::{EmailAddress, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already holds the username.
        DuplicateUsername => "username already exists",
        /// Another user already holds the email address.
        DuplicateEmail => "email already exists",
        /// No user matched the identifier.
        NotFound => "user not found",
    }
}

/// A user together with the stored password hash.
///
/// The hash never leaves the domain layer: adapters persist it and the
/// credential store verifies against it, but it is not exposed on [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    user: User,
    password_hash: PasswordHash,
}

impl UserRecord {
    pub fn new(user: User, password_hash: PasswordHash) -> Self {
        Self {
            user,
            password_hash,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn into_user(self) -> User {
        self.user
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

/// Storage for registered users.
///
/// `insert` must enforce username and email uniqueness atomically: of two
/// concurrent inserts sharing either value, exactly one succeeds and the other
/// reports the matching `Duplicate*` variant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user record.
    async fn insert(&self, record: &UserRecord) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, UserPersistenceError>;

    /// Fetch a user by exact username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserRecord>, UserPersistenceError>;

    /// Fetch a user by normalised email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserRecord>, UserPersistenceError>;

    /// Replace the stored hash; fails with `NotFound` when no row matched.
    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;
}
