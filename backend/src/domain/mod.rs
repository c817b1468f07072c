//! Domain primitives, services and ports.
//!
//! Purpose: hold the authentication and session-authorisation core free of
//! HTTP and database concerns. Inbound adapters call the services; outbound
//! adapters implement the ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User and its field newtypes, Role.
//! - PlainPassword, PasswordHash, PasswordHashing: password policy.
//! - Session, SessionManager: session port.
//! - require_authenticated / require_role: access checks.
//! - CredentialStore, AuthService: use-cases.

pub mod access_guard;
pub mod auth;
pub mod auth_service;
pub mod credential_store;
pub mod error;
pub mod password;
pub mod ports;
pub mod session;
pub mod trace_id;
pub mod user;

pub use self::access_guard::{AccessDenied, require_authenticated, require_role};
pub use self::auth::{
    FormValidationError, LoginCredentials, LoginValidationError, PasswordResetForm,
    Registration, RegistrationForm,
};
pub use self::auth_service::{AuthService, INVALID_CREDENTIALS, RESET_ACKNOWLEDGEMENT};
pub use self::credential_store::CredentialStore;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::password::{
    PASSWORD_MIN_LEN, PasswordHash, PasswordHashError, PasswordHashing, PlainPassword,
};
pub use self::session::{Session, SessionManager};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    ContactNumber, EmailAddress, FullName, Role, User, UserId, UserProfile, UserValidationError,
    Username,
};

