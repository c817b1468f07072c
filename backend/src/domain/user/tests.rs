//! Validation coverage for user field newtypes.

use super::*;
use rstest::rstest;

#[rstest]
#[case("")]
#[case("not-a-uuid")]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
fn user_id_rejects_invalid_values(#[case] raw: &str) {
    assert_eq!(UserId::new(raw), Err(UserValidationError::InvalidId));
}

#[rstest]
fn user_id_accepts_uuid() {
    let raw = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
    let id = UserId::new(raw).expect("valid uuid");
    assert_eq!(id.to_string(), raw);
}

#[rstest]
#[case("doctor", Role::Doctor)]
#[case("patient", Role::Patient)]
#[case(" Doctor ", Role::Doctor)]
fn role_parses_known_values(#[case] raw: &str, #[case] expected: Role) {
    assert_eq!(raw.parse::<Role>(), Ok(expected));
}

#[rstest]
#[case("admin")]
#[case("")]
fn role_rejects_unknown_values(#[case] raw: &str) {
    assert_eq!(raw.parse::<Role>(), Err(UserValidationError::UnknownRole));
}

#[rstest]
fn username_is_trimmed() {
    let username = Username::new("  alice  ").expect("valid username");
    assert_eq!(username.as_ref(), "alice");
}

#[rstest]
fn username_rejects_blank_and_long_values() {
    assert_eq!(Username::new("   "), Err(UserValidationError::EmptyUsername));
    let long = "a".repeat(USERNAME_MAX + 1);
    assert_eq!(
        Username::new(long),
        Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX })
    );
}

#[rstest]
#[case("A@X.com", "a@x.com")]
#[case(" bob@example.org ", "bob@example.org")]
fn email_is_normalised(#[case] raw: &str, #[case] expected: &str) {
    let email = EmailAddress::new(raw).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

#[rstest]
#[case("no-at-sign")]
#[case("@x.com")]
#[case("a@")]
#[case("a b@x.com")]
fn email_rejects_malformed_values(#[case] raw: &str) {
    assert_eq!(EmailAddress::new(raw), Err(UserValidationError::InvalidEmail));
}

#[rstest]
fn email_limit_applies_to_the_lower_cased_form() {
    let local_len = EMAIL_MAX - "@x.com".len();
    let ascii = format!("{}@x.com", "a".repeat(local_len));
    assert!(EmailAddress::new(&ascii).is_ok());

    let dotted = format!("{}@x.com", "\u{130}".repeat(local_len));
    assert_eq!(dotted.chars().count(), EMAIL_MAX);
    assert_eq!(
        EmailAddress::new(&dotted),
        Err(UserValidationError::EmailTooLong { max: EMAIL_MAX })
    );
}

#[rstest]
fn contact_enforces_column_limit() {
    let long = "1".repeat(CONTACT_MAX + 1);
    assert_eq!(
        ContactNumber::new(long),
        Err(UserValidationError::ContactTooLong { max: CONTACT_MAX })
    );
    assert!(ContactNumber::new("123").is_ok());
}

#[rstest]
fn user_exposes_profile_fields() {
    let id = UserId::random();
    let user = User::new(
        id,
        UserProfile {
            username: Username::new("alice").expect("username"),
            email: EmailAddress::new("a@x.com").expect("email"),
            full_name: FullName::new("Alice A").expect("full name"),
            role: Role::Patient,
            contact: ContactNumber::new("123").expect("contact"),
        },
    );
    assert_eq!(user.id(), &id);
    assert_eq!(user.username().as_ref(), "alice");
    assert_eq!(user.role(), Role::Patient);
    assert_eq!(user.full_name().as_ref(), "Alice A");
}
