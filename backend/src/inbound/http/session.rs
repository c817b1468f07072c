//! Cookie-backed [`SessionManager`] for HTTP handlers.
//!
//! Wraps the actix session so handlers and the auth service only see domain
//! operations. The cookie is signed and encrypted by the session middleware;
//! it carries the user id and role, nothing else.

use actix_session::Session as ActixSession;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Role, Session, SessionManager, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_KEY: &str = "role";

/// Request-scoped session handle extracted from the actix session.
#[derive(Clone)]
pub struct SessionContext(ActixSession);

impl SessionContext {
    pub fn new(session: ActixSession) -> Self {
        Self(session)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.0.get::<String>(key) {
            Ok(value) => value,
            Err(error) => {
                warn!(key, %error, "unreadable session entry");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Error> {
        self.0.insert(key, value).map_err(|error| {
            // Never leave half an identity behind.
            self.0.purge();
            Error::internal(format!("failed to persist session: {error}"))
        })
    }
}

impl SessionManager for SessionContext {
    fn establish(&self, user_id: UserId, role: Role) -> Result<Session, Error> {
        // New session key; state from any previous login is discarded.
        self.0.renew();
        self.0.clear();
        self.write(USER_ID_KEY, &user_id.to_string())?;
        self.write(ROLE_KEY, role.as_str())?;
        Ok(Session::new(user_id, role))
    }

    fn current(&self) -> Option<Session> {
        let raw_id = self.read(USER_ID_KEY);
        let raw_role = self.read(ROLE_KEY);
        let (raw_id, raw_role) = match (raw_id, raw_role) {
            (None, None) => return None,
            (Some(id), Some(role)) => (id, role),
            _ => {
                warn!("partial session state ignored");
                return None;
            }
        };
        match (UserId::new(&raw_id), raw_role.parse::<Role>()) {
            (Ok(user_id), Ok(role)) => Some(Session::new(user_id, role)),
            (id, role) => {
                warn!(
                    id_valid = id.is_ok(),
                    role_valid = role.is_ok(),
                    "malformed session state ignored"
                );
                None
            }
        }
    }

    fn destroy(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = ActixSession::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests;
