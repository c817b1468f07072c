//! Authentication use-cases: register, login, logout and password resets.
//!
//! The service is transport agnostic. Callers pass the request's
//! [`SessionManager`] so the same logic runs against cookie sessions in HTTP
//! handlers and against an in-memory double in tests.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::access_guard::require_authenticated;
use crate::domain::auth::{
    LoginCredentials, PasswordResetForm, RegistrationForm, ResetTarget, parse_reset_email,
};
use crate::domain::credential_store::{CredentialStore, USER_NOT_FOUND, map_persistence_error};
use crate::domain::ports::{PasswordResetNotifier, UserPersistenceError};
use crate::domain::{Error, Session, SessionManager, User};

/// Message returned for both unknown users and wrong passwords.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";
/// Acknowledgement returned by every forgot-password request.
pub const RESET_ACKNOWLEDGEMENT: &str =
    "If an account with this email exists, a password reset link has been sent";

/// Orchestrates the credential store, session manager and reset notifier.
#[derive(Clone)]
pub struct AuthService {
    credentials: CredentialStore,
    notifier: Arc<dyn PasswordResetNotifier>,
}

impl AuthService {
    pub fn new(credentials: CredentialStore, notifier: Arc<dyn PasswordResetNotifier>) -> Self {
        Self {
            credentials,
            notifier,
        }
    }

    /// Register a user and log them in.
    ///
    /// Username uniqueness is reported before email uniqueness. The storage
    /// constraint still decides races between concurrent registrations.
    pub async fn register<S>(&self, sessions: &S, form: &RegistrationForm) -> Result<User, Error>
    where
        S: SessionManager + ?Sized,
    {
        let registration = form.validate()?;
        let profile = registration.profile;
        if self
            .credentials
            .find_by_username(&profile.username)
            .await?
            .is_some()
        {
            return Err(map_persistence_error(UserPersistenceError::DuplicateUsername));
        }
        if self
            .credentials
            .find_by_email(&profile.email)
            .await?
            .is_some()
        {
            return Err(map_persistence_error(UserPersistenceError::DuplicateEmail));
        }
        let user = self
            .credentials
            .create_user(profile, &registration.password)
            .await?;
        sessions.establish(*user.id(), user.role())?;
        info!(user_id = %user.id(), role = %user.role(), "user registered");
        Ok(user)
    }

    /// Verify credentials and establish a session.
    pub async fn login<S>(&self, sessions: &S, credentials: &LoginCredentials) -> Result<User, Error>
    where
        S: SessionManager + ?Sized,
    {
        let Some(user) = self.credentials.authenticate(credentials).await? else {
            warn!("login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        sessions.establish(*user.id(), user.role())?;
        info!(user_id = %user.id(), "login succeeded");
        Ok(user)
    }

    /// Drop the current session whether or not one exists.
    pub fn logout<S>(&self, sessions: &S)
    where
        S: SessionManager + ?Sized,
    {
        if let Some(session) = sessions.current() {
            info!(user_id = %session.user_id(), "logout");
        }
        sessions.destroy();
    }

    /// Acknowledge a reset request without revealing whether the account
    /// exists. Lookup or delivery failures are logged, not surfaced.
    pub async fn request_password_reset(&self, email: Option<&str>) -> Result<&'static str, Error> {
        let ResetTarget::Email(email) = parse_reset_email(email)? else {
            return Ok(RESET_ACKNOWLEDGEMENT);
        };
        match self.credentials.find_by_email(&email).await {
            Ok(Some(user)) => {
                if let Err(err) = self.notifier.notify(&user).await {
                    warn!(user_id = %user.id(), error = %err, "password reset notification failed");
                }
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "password reset lookup failed"),
        }
        Ok(RESET_ACKNOWLEDGEMENT)
    }

    /// Change the password of the signed-in user.
    ///
    /// The session is checked before the form is looked at.
    pub async fn reset_password<S>(&self, sessions: &S, form: &PasswordResetForm) -> Result<(), Error>
    where
        S: SessionManager + ?Sized,
    {
        let session = require_authenticated(sessions)?;
        let password = form.validate()?;
        self.credentials
            .set_password(session.user_id(), &password)
            .await
    }

    /// Load the user behind the current session.
    pub async fn current_user<S>(&self, sessions: &S) -> Result<User, Error>
    where
        S: SessionManager + ?Sized,
    {
        let session = require_authenticated(sessions)?;
        self.user_for(&session).await
    }

    /// Load the user a session refers to.
    pub async fn user_for(&self, session: &Session) -> Result<User, Error> {
        self.credentials
            .find_by_id(session.user_id())
            .await?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }
}

#[cfg(test)]
mod tests;
