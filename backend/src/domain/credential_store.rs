//! Credential store: owns user records and their password hashes.
//!
//! This is the only component that sees a [`PasswordHash`]. Callers receive
//! plain [`User`] values and booleans.

use std::sync::Arc;

use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::password::{PasswordHash, PasswordHashError, PasswordHashing, PlainPassword};
use crate::domain::ports::{UserPersistenceError, UserRecord, UserRepository};
use crate::domain::{EmailAddress, Error, LoginCredentials, User, UserId, UserProfile, Username};

pub(crate) const USERNAME_TAKEN: &str = "Username already exists";
pub(crate) const EMAIL_TAKEN: &str = "Email already exists";
pub(crate) const USER_NOT_FOUND: &str = "User not found";

/// User storage plus password hashing policy.
#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserRepository>,
    hashing: PasswordHashing,
}

impl CredentialStore {
    pub fn new(users: Arc<dyn UserRepository>, hashing: PasswordHashing) -> Self {
        Self { users, hashing }
    }

    /// Create a user with a freshly hashed password.
    ///
    /// Uniqueness is decided by the repository insert, so concurrent callers
    /// racing on the same username see exactly one success.
    pub async fn create_user(
        &self,
        profile: UserProfile,
        password: &PlainPassword,
    ) -> Result<User, Error> {
        let hash = self.hash(password).await?;
        let user = User::new(UserId::random(), profile);
        let record = UserRecord::new(user, hash);
        self.users
            .insert(&record)
            .await
            .map_err(map_persistence_error)?;
        info!(user_id = %record.user().id(), role = %record.user().role(), "user created");
        Ok(record.into_user())
    }

    /// Check `password` against the stored hash of `record`.
    pub async fn verify_password(
        &self,
        record: &UserRecord,
        password: &PlainPassword,
    ) -> Result<bool, Error> {
        let hashing = self.hashing.clone();
        let hash = record.password_hash().clone();
        let password = password.clone();
        tokio::task::spawn_blocking(move || hashing.verify(&password, &hash))
            .await
            .map_err(|err| {
                error!(error = %err, "password verification task failed");
                Error::internal("password verification failed")
            })
    }

    /// Replace the stored password of `id`.
    pub async fn set_password(&self, id: &UserId, password: &PlainPassword) -> Result<(), Error> {
        let hash = self.hash(password).await?;
        self.users
            .update_password_hash(id, &hash)
            .await
            .map_err(map_persistence_error)?;
        info!(user_id = %id, "password changed");
        Ok(())
    }

    pub async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users
            .find_by_id(id)
            .await
            .map(|found| found.map(UserRecord::into_user))
            .map_err(map_persistence_error)
    }

    pub async fn find_by_username(&self, username: &Username) -> Result<Option<User>, Error> {
        self.users
            .find_by_username(username)
            .await
            .map(|found| found.map(UserRecord::into_user))
            .map_err(map_persistence_error)
    }

    pub async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, Error> {
        self.users
            .find_by_email(email)
            .await
            .map(|found| found.map(UserRecord::into_user))
            .map_err(map_persistence_error)
    }

    /// Resolve credentials to a user.
    ///
    /// Returns `Ok(None)` for an unknown username and for a wrong password
    /// alike. Unknown usernames still pay for one hash verification.
    pub async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Option<User>, Error> {
        let password = credentials.password().clone();
        let Ok(username) = Username::new(credentials.username()) else {
            self.verify_dummy(password).await;
            return Ok(None);
        };
        let record = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_persistence_error)?;
        match record {
            Some(record) => {
                if self.verify_password(&record, &password).await? {
                    Ok(Some(record.into_user()))
                } else {
                    Ok(None)
                }
            }
            None => {
                self.verify_dummy(password).await;
                Ok(None)
            }
        }
    }

    async fn verify_dummy(&self, password: PlainPassword) {
        let hashing = self.hashing.clone();
        if let Err(err) = tokio::task::spawn_blocking(move || hashing.verify_dummy(&password)).await
        {
            warn!(error = %err, "dummy password verification task failed");
        }
    }

    async fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, Error> {
        let hashing = self.hashing.clone();
        let password = password.clone();
        tokio::task::spawn_blocking(move || hashing.hash(&password))
            .await
            .map_err(|err| {
                error!(error = %err, "password hashing task failed");
                Error::internal("password hashing failed")
            })?
            .map_err(map_hash_error)
    }
}

fn map_hash_error(err: PasswordHashError) -> Error {
    match err {
        PasswordHashError::TooShort { min } => {
            Error::invalid_request(format!("Password must be at least {min} characters long"))
                .with_details(json!({ "field": "password", "code": "password_too_short" }))
        }
        other => {
            error!(error = %other, "password hashing failed");
            Error::internal("password hashing failed")
        }
    }
}

pub(crate) fn map_persistence_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Connection { message } => {
            warn!(error = %message, "user store unavailable");
            Error::service_unavailable("user store unavailable")
        }
        UserPersistenceError::Query { message } => {
            error!(error = %message, "user store query failed");
            Error::internal("user store query failed")
        }
        UserPersistenceError::DuplicateUsername => Error::conflict(USERNAME_TAKEN)
            .with_details(json!({ "field": "username", "code": "duplicate_username" })),
        UserPersistenceError::DuplicateEmail => Error::conflict(EMAIL_TAKEN)
            .with_details(json!({ "field": "email", "code": "duplicate_email" })),
        UserPersistenceError::NotFound => Error::not_found(USER_NOT_FOUND),
    }
}
