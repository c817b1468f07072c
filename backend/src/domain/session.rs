//! Authenticated session state and the port that stores it.
//!
//! A session binds a client to exactly one user and that user's role. The
//! role is copied into the session at login so gating decisions do not need a
//! database round-trip.

use crate::domain::{Error, Role, UserId};

/// Identity carried by an authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    role: Role,
}

impl Session {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Per-request view of the client's session store.
///
/// Implementations are request-scoped and need not be `Send`.
///
/// ## Invariants
/// - After [`SessionManager::establish`] succeeds, [`SessionManager::current`]
///   returns the new identity and any previous identity is gone.
/// - [`SessionManager::current`] fails closed: unreadable or partial state
///   yields `None`.
/// - [`SessionManager::destroy`] is idempotent.
pub trait SessionManager {
    /// Replace any existing session with a fresh one for `user_id`.
    fn establish(&self, user_id: UserId, role: Role) -> Result<Session, Error>;

    /// Identity of the current session, if one is established and intact.
    fn current(&self) -> Option<Session>;

    /// Drop the session; a no-op when none exists.
    fn destroy(&self);
}

#[cfg(test)]
pub(crate) mod memory {
    //! Session manager double for service-level tests.

    use std::cell::{Cell, RefCell};

    use super::*;

    #[derive(Debug, Default)]
    pub(crate) struct InMemorySessionManager {
        session: RefCell<Option<Session>>,
        renewals: Cell<u32>,
    }

    impl InMemorySessionManager {
        pub(crate) fn logged_in(user_id: UserId, role: Role) -> Self {
            let manager = Self::default();
            manager.session.replace(Some(Session::new(user_id, role)));
            manager
        }

        pub(crate) fn renewals(&self) -> u32 {
            self.renewals.get()
        }
    }

    impl SessionManager for InMemorySessionManager {
        fn establish(&self, user_id: UserId, role: Role) -> Result<Session, Error> {
            let session = Session::new(user_id, role);
            self.renewals.set(self.renewals.get() + 1);
            self.session.replace(Some(session));
            Ok(session)
        }

        fn current(&self) -> Option<Session> {
            *self.session.borrow()
        }

        fn destroy(&self) {
            self.session.replace(None);
        }
    }
}
