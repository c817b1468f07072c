//! Authentication inputs: login credentials, registration and reset forms.
//!
//! Inbound adapters hand over raw optional strings; the constructors here
//! validate them in a fixed order before any service touches storage.

use serde_json::json;

use crate::domain::password::{PASSWORD_MIN_LEN, PlainPassword};
use crate::domain::{
    ContactNumber, EmailAddress, Error, FullName, Role, UserProfile, UserValidationError,
    Username,
};

pub(crate) const MISSING_FIELDS: &str = "Missing required fields";
pub(crate) const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub(crate) const CREDENTIALS_REQUIRED: &str = "Username and password required";
pub(crate) const EMAIL_REQUIRED: &str = "Email is required";

fn password_too_short() -> String {
    format!("Password must be at least {PASSWORD_MIN_LEN} characters long")
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|raw| !raw.trim().is_empty())
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was missing or empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl From<LoginValidationError> for Error {
    fn from(err: LoginValidationError) -> Self {
        let field = match err {
            LoginValidationError::EmptyUsername => "username",
            LoginValidationError::EmptyPassword => "password",
        };
        Error::invalid_request(CREDENTIALS_REQUIRED)
            .with_details(json!({ "field": field, "code": "missing_field" }))
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use careportal::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(Some(" alice "), Some("longenough1")).unwrap();
/// assert_eq!(creds.username(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: PlainPassword,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, LoginValidationError> {
        let username = present(username).ok_or(LoginValidationError::EmptyUsername)?;
        let password = password
            .filter(|raw| !raw.is_empty())
            .ok_or(LoginValidationError::EmptyPassword)?;
        Ok(Self {
            username: username.trim().to_owned(),
            password: PlainPassword::new(password),
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &PlainPassword {
        &self.password
    }
}

/// Reasons a registration or password form is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormValidationError {
    #[error("missing required field {field}")]
    MissingField { field: &'static str },
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("password is shorter than the minimum length")]
    PasswordTooShort,
    #[error("invalid {field}: {source}")]
    InvalidField {
        field: &'static str,
        source: UserValidationError,
    },
}

impl From<FormValidationError> for Error {
    fn from(err: FormValidationError) -> Self {
        match err {
            FormValidationError::MissingField { field } => Error::invalid_request(MISSING_FIELDS)
                .with_details(json!({ "field": field, "code": "missing_field" })),
            FormValidationError::PasswordMismatch => Error::invalid_request(PASSWORD_MISMATCH)
                .with_details(json!({ "field": "confirmPassword", "code": "password_mismatch" })),
            FormValidationError::PasswordTooShort => Error::invalid_request(password_too_short())
                .with_details(json!({ "field": "password", "code": "password_too_short" })),
            FormValidationError::InvalidField { field, source } => {
                Error::invalid_request(source.to_string())
                    .with_details(json!({ "field": field, "code": format!("invalid_{field}") }))
            }
        }
    }
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, FormValidationError> {
    present(value).ok_or(FormValidationError::MissingField { field })
}

fn checked_password(password: &str, confirm: &str) -> Result<PlainPassword, FormValidationError> {
    if password != confirm {
        return Err(FormValidationError::PasswordMismatch);
    }
    let password = PlainPassword::new(password);
    if !password.meets_minimum_length() {
        return Err(FormValidationError::PasswordTooShort);
    }
    Ok(password)
}

fn shaped<T>(
    field: &'static str,
    result: Result<T, UserValidationError>,
) -> Result<T, FormValidationError> {
    result.map_err(|source| FormValidationError::InvalidField { field, source })
}

/// Raw registration fields as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub user_type: Option<String>,
    pub contact: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

/// Registration that passed every field-level check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub profile: UserProfile,
    pub password: PlainPassword,
}

impl RegistrationForm {
    /// Validate in order: presence, password match, password length, then
    /// field shapes. The first failure wins.
    pub fn validate(&self) -> Result<Registration, FormValidationError> {
        let full_name = required("fullName", self.full_name.as_deref())?;
        let email = required("email", self.email.as_deref())?;
        let username = required("username", self.username.as_deref())?;
        let user_type = required("userType", self.user_type.as_deref())?;
        let contact = required("contact", self.contact.as_deref())?;
        let password = required("password", self.password.as_deref())?;
        let confirm = required("confirmPassword", self.confirm_password.as_deref())?;

        let password = checked_password(password, confirm)?;

        let profile = UserProfile {
            full_name: shaped("fullName", FullName::new(full_name))?,
            email: shaped("email", EmailAddress::new(email))?,
            username: shaped("username", Username::new(username))?,
            role: shaped("userType", user_type.parse::<Role>())?,
            contact: shaped("contact", ContactNumber::new(contact))?,
        };
        Ok(Registration { profile, password })
    }
}

/// Raw new-password fields for an authenticated reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordResetForm {
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

impl PasswordResetForm {
    pub fn validate(&self) -> Result<PlainPassword, FormValidationError> {
        let password = required("newPassword", self.new_password.as_deref())?;
        let confirm = required("confirmPassword", self.confirm_password.as_deref())?;
        checked_password(password, confirm)
    }
}

/// Outcome of parsing a forgot-password email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetTarget {
    /// A well-formed address worth looking up.
    Email(EmailAddress),
    /// Present but malformed; acknowledged without a lookup.
    Unresolvable,
}

/// Parse the forgot-password email field.
pub fn parse_reset_email(email: Option<&str>) -> Result<ResetTarget, Error> {
    let raw = present(email).ok_or_else(|| {
        Error::invalid_request(EMAIL_REQUIRED)
            .with_details(json!({ "field": "email", "code": "missing_field" }))
    })?;
    Ok(EmailAddress::new(raw).map_or(ResetTarget::Unresolvable, ResetTarget::Email))
}
