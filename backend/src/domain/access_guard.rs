//! Access checks for protected operations and pages.
//!
//! Both checks read only the session; neither consults storage. A wrong role
//! is reported to callers exactly like a missing session so responses do not
//! reveal which roles exist on an account.

use tracing::debug;

use crate::domain::{Error, Role, Session, SessionManager};

/// Reasons an access check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("no authenticated session")]
    Unauthenticated,
    #[error("session role {actual} does not match required role {expected}")]
    WrongRole { expected: Role, actual: Role },
}

impl From<AccessDenied> for Error {
    fn from(_: AccessDenied) -> Self {
        Error::unauthorized("User not authenticated")
    }
}

/// Require an established session.
pub fn require_authenticated<S>(sessions: &S) -> Result<Session, AccessDenied>
where
    S: SessionManager + ?Sized,
{
    sessions.current().ok_or(AccessDenied::Unauthenticated)
}

/// Require an established session whose role equals `role`.
pub fn require_role<S>(sessions: &S, role: Role) -> Result<Session, AccessDenied>
where
    S: SessionManager + ?Sized,
{
    let session = require_authenticated(sessions)?;
    if session.role() == role {
        Ok(session)
    } else {
        let denied = AccessDenied::WrongRole {
            expected: role,
            actual: session.role(),
        };
        debug!(user_id = %session.user_id(), reason = %denied, "role check failed");
        Err(denied)
    }
}
