//! Driven port for delivering password reset notifications.
//!
//! Delivery outcome never changes what the caller of the forgot-password
//! operation sees, so adapters report failures only for logging.

use async_trait::async_trait;
use tracing::info;

use crate::domain::User;

use super::define_port_error;

define_port_error! {
    /// Errors raised while handing a reset notification to a delivery channel.
    pub enum PasswordResetNotifierError {
        /// The delivery channel rejected or dropped the message.
        Delivery { message: String } => "password reset delivery failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordResetNotifier: Send + Sync {
    /// Notify `user` that a password reset was requested.
    async fn notify(&self, user: &User) -> Result<(), PasswordResetNotifierError>;
}

/// Notifier that records the request in the structured log.
///
/// No reset token or link is produced; the event exists so operators can see
/// reset activity.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingPasswordResetNotifier;

#[async_trait]
impl PasswordResetNotifier for LoggingPasswordResetNotifier {
    async fn notify(&self, user: &User) -> Result<(), PasswordResetNotifierError> {
        info!(user_id = %user.id(), "password reset requested");
        Ok(())
    }
}
