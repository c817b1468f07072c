//! User data model.
//!
//! Every field of a [`User`] is a validated newtype so adapters cannot build
//! a user that violates the column limits or the role enumeration.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

/// Maximum username length, matching the `users.username` column.
pub const USERNAME_MAX: usize = 80;
/// Maximum email length, matching the `users.email` column.
pub const EMAIL_MAX: usize = 120;
/// Maximum full name length, matching the `users.full_name` column.
pub const FULL_NAME_MAX: usize = 120;
/// Maximum contact length, matching the `users.contact` column.
pub const CONTACT_MAX: usize = 20;

/// Validation errors raised by the user field constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must be a valid address")]
    InvalidEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("full name must not be empty")]
    EmptyFullName,
    #[error("full name must be at most {max} characters")]
    FullNameTooLong { max: usize },
    #[error("contact must not be empty")]
    EmptyContact,
    #[error("contact must be at most {max} characters")]
    ContactTooLong { max: usize },
    #[error("user type must be one of doctor, patient")]
    UnknownRole,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, e.g. one read back from the database.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role a user registers with; it selects the dashboard and gated operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Doctor,
    Patient,
}

impl Role {
    /// Wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::Patient => "patient",
        }
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "doctor" => Ok(Self::Doctor),
            "patient" => Ok(Self::Patient),
            _ => Err(UserValidationError::UnknownRole),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn bounded(
    value: &str,
    max: usize,
    empty: UserValidationError,
    too_long: UserValidationError,
) -> Result<String, UserValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > max {
        return Err(too_long);
    }
    Ok(trimmed.to_owned())
}

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

string_newtype! {
    /// Unique login name. Trimmed; never renamed after registration.
    Username
}

impl Username {
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        bounded(
            value.as_ref(),
            USERNAME_MAX,
            UserValidationError::EmptyUsername,
            UserValidationError::UsernameTooLong { max: USERNAME_MAX },
        )
        .map(Self)
    }
}

string_newtype! {
    /// Unique email address, stored lower-cased so uniqueness ignores case.
    EmailAddress
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only; deliverability is not our concern.
        Regex::new(r"^[^@\s]+@[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

impl EmailAddress {
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        // Bound the lower-cased form; it is what gets stored.
        let normalised = bounded(
            &value.as_ref().to_lowercase(),
            EMAIL_MAX,
            UserValidationError::EmptyEmail,
            UserValidationError::EmailTooLong { max: EMAIL_MAX },
        )?;
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

string_newtype! {
    /// Name shown on dashboards.
    FullName
}

impl FullName {
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        bounded(
            value.as_ref(),
            FULL_NAME_MAX,
            UserValidationError::EmptyFullName,
            UserValidationError::FullNameTooLong { max: FULL_NAME_MAX },
        )
        .map(Self)
    }
}

string_newtype! {
    /// Free-form contact detail, usually a phone number.
    ContactNumber
}

impl ContactNumber {
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        bounded(
            value.as_ref(),
            CONTACT_MAX,
            UserValidationError::EmptyContact,
            UserValidationError::ContactTooLong { max: CONTACT_MAX },
        )
        .map(Self)
    }
}

/// Registered portal user.
///
/// ## Invariants
/// - `id`, `username` and `role` never change after creation.
/// - The password hash is not part of this type; it stays inside the
///   credential store (see [`crate::domain::ports::UserRecord`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    full_name: FullName,
    role: Role,
    contact: ContactNumber,
}

/// Validated profile fields used to create a [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub username: Username,
    pub email: EmailAddress,
    pub full_name: FullName,
    pub role: Role,
    pub contact: ContactNumber,
}

impl User {
    /// Build a user from an identifier and validated profile fields.
    pub fn new(id: UserId, profile: UserProfile) -> Self {
        let UserProfile {
            username,
            email,
            full_name,
            role,
            contact,
        } = profile;
        Self {
            id,
            username,
            email,
            full_name,
            role,
            contact,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn contact(&self) -> &ContactNumber {
        &self.contact
    }
}

#[cfg(test)]
mod tests;
