//! Builders for the HTTP state and the user store behind it.

use std::sync::Arc;

use tracing::warn;

use crate::domain::ports::{LoggingPasswordResetNotifier, UserRepository};
use crate::domain::{AuthService, CredentialStore, PasswordHashing};
use crate::inbound::http::pages::StaticPageRenderer;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryUserRepository;
use crate::outbound::persistence::{DbPool, DieselUserRepository};

/// Pick the PostgreSQL adapter when a pool is configured, otherwise keep
/// users in process memory.
pub fn build_user_repository(pool: Option<&DbPool>) -> Arc<dyn UserRepository> {
    match pool {
        Some(pool) => Arc::new(DieselUserRepository::new(pool.clone())),
        None => {
            warn!("no database configured; registered users are lost on restart");
            Arc::new(InMemoryUserRepository::new())
        }
    }
}

/// Wire the auth service and page renderer around a user repository.
pub fn build_http_state(users: Arc<dyn UserRepository>, hashing: PasswordHashing) -> HttpState {
    let credentials = CredentialStore::new(users, hashing);
    let auth = AuthService::new(credentials, Arc::new(LoggingPasswordResetNotifier));
    HttpState::new(Arc::new(auth), Arc::new(StaticPageRenderer))
}
