//! Domain ports for the hexagonal boundary.
//!
//! Driven adapters (database, in-memory store, notification channel) implement
//! these traits and map their failures into the typed port errors.

mod macros;
pub(crate) use macros::define_port_error;

mod password_reset_notifier;
mod user_repository;

#[cfg(test)]
pub use password_reset_notifier::MockPasswordResetNotifier;
pub use password_reset_notifier::{
    LoggingPasswordResetNotifier, PasswordResetNotifier, PasswordResetNotifierError,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRecord, UserRepository};
