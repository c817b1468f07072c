//! Use-case coverage for the authentication service.

use super::*;
use crate::domain::password::PasswordHashing;
use crate::domain::ports::{
    MockPasswordResetNotifier, PasswordResetNotifierError, UserRepository,
};
use crate::domain::session::memory::InMemorySessionManager;
use crate::domain::{ErrorCode, Role, UserId};
use crate::outbound::memory::InMemoryUserRepository;
use rstest::{fixture, rstest};

struct Harness {
    service: AuthService,
    repo: Arc<InMemoryUserRepository>,
}

fn harness_with(notifier: MockPasswordResetNotifier) -> Harness {
    let repo = Arc::new(InMemoryUserRepository::new());
    let users: Arc<dyn UserRepository> = repo.clone();
    let hashing = PasswordHashing::with_cost(8, 1, 1).expect("cheap test params");
    Harness {
        service: AuthService::new(CredentialStore::new(users, hashing), Arc::new(notifier)),
        repo,
    }
}

#[fixture]
fn harness() -> Harness {
    harness_with(MockPasswordResetNotifier::new())
}

fn alice_form() -> RegistrationForm {
    RegistrationForm {
        full_name: Some("Alice Able".into()),
        email: Some("a@x.com".into()),
        username: Some("alice".into()),
        user_type: Some("patient".into()),
        contact: Some("123".into()),
        password: Some("longenough1".into()),
        confirm_password: Some("longenough1".into()),
    }
}

fn login_form(username: &str, password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts(Some(username), Some(password)).expect("credentials")
}

fn reset_form(password: &str, confirm: &str) -> PasswordResetForm {
    PasswordResetForm {
        new_password: Some(password.into()),
        confirm_password: Some(confirm.into()),
    }
}

#[rstest]
#[tokio::test]
async fn registration_logs_the_user_in(harness: Harness) {
    let sessions = InMemorySessionManager::default();
    let user = harness
        .service
        .register(&sessions, &alice_form())
        .await
        .expect("register");

    let session = sessions.current().expect("session established");
    assert_eq!(session.user_id(), user.id());
    assert_eq!(session.role(), Role::Patient);
    let current = harness
        .service
        .current_user(&sessions)
        .await
        .expect("current user");
    assert_eq!(current, user);
}

#[rstest]
#[tokio::test]
async fn invalid_registration_creates_nothing(harness: Harness) {
    let sessions = InMemorySessionManager::default();
    let mut form = alice_form();
    form.password = Some("short".into());
    form.confirm_password = Some("short".into());

    let err = harness
        .service
        .register(&sessions, &form)
        .await
        .expect_err("short password");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert!(harness.repo.is_empty());
    assert!(sessions.current().is_none());
}

#[rstest]
#[case::username("alice", "other@x.com", "Username already exists")]
#[case::email("bob", "A@X.COM", "Email already exists")]
#[case::both("alice", "a@x.com", "Username already exists")]
#[tokio::test]
async fn duplicates_report_username_first(
    harness: Harness,
    #[case] username: &str,
    #[case] email: &str,
    #[case] message: &str,
) {
    let sessions = InMemorySessionManager::default();
    harness
        .service
        .register(&sessions, &alice_form())
        .await
        .expect("first registration");

    let mut form = alice_form();
    form.username = Some(username.into());
    form.email = Some(email.into());
    let err = harness
        .service
        .register(&InMemorySessionManager::default(), &form)
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), message);
    assert_eq!(harness.repo.len(), 1);
}

#[rstest]
#[tokio::test]
async fn login_failures_are_indistinguishable(harness: Harness) {
    harness
        .service
        .register(&InMemorySessionManager::default(), &alice_form())
        .await
        .expect("register");

    let sessions = InMemorySessionManager::default();
    let wrong_password = harness
        .service
        .login(&sessions, &login_form("alice", "wrongpass1"))
        .await
        .expect_err("wrong password");
    let unknown_user = harness
        .service
        .login(&sessions, &login_form("nobody", "wrongpass1"))
        .await
        .expect_err("unknown user");

    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password.message(), INVALID_CREDENTIALS);
    assert!(sessions.current().is_none());
}

#[rstest]
#[tokio::test]
async fn login_replaces_an_existing_session(harness: Harness) {
    let user = harness
        .service
        .register(&InMemorySessionManager::default(), &alice_form())
        .await
        .expect("register");
    let sessions = InMemorySessionManager::logged_in(UserId::random(), Role::Doctor);

    harness
        .service
        .login(&sessions, &login_form("alice", "longenough1"))
        .await
        .expect("login");

    let session = sessions.current().expect("session");
    assert_eq!(session.user_id(), user.id());
    assert_eq!(session.role(), Role::Patient);
    assert_eq!(sessions.renewals(), 1);
}

#[rstest]
fn logout_is_idempotent(harness: Harness) {
    let sessions = InMemorySessionManager::logged_in(UserId::random(), Role::Patient);
    harness.service.logout(&sessions);
    harness.service.logout(&sessions);
    assert!(sessions.current().is_none());
}

#[rstest]
#[tokio::test]
async fn reset_without_session_is_unauthenticated(harness: Harness) {
    let err = harness
        .service
        .reset_password(&InMemorySessionManager::default(), &reset_form("x", "y"))
        .await
        .expect_err("no session");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn reset_changes_the_password(harness: Harness) {
    let sessions = InMemorySessionManager::default();
    harness
        .service
        .register(&sessions, &alice_form())
        .await
        .expect("register");
    harness
        .service
        .reset_password(&sessions, &reset_form("brandnewpass", "brandnewpass"))
        .await
        .expect("reset");

    let fresh = InMemorySessionManager::default();
    assert!(
        harness
            .service
            .login(&fresh, &login_form("alice", "longenough1"))
            .await
            .is_err()
    );
    harness
        .service
        .login(&fresh, &login_form("alice", "brandnewpass"))
        .await
        .expect("login with new password");
}

#[rstest]
#[tokio::test]
async fn reset_for_deleted_user_is_not_found(harness: Harness) {
    let sessions = InMemorySessionManager::logged_in(UserId::random(), Role::Patient);
    let err = harness
        .service
        .reset_password(&sessions, &reset_form("brandnewpass", "brandnewpass"))
        .await
        .expect_err("stale session");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn forgot_password_is_generic_for_unknown_accounts() {
    let mut notifier = MockPasswordResetNotifier::new();
    notifier.expect_notify().never();
    let harness = harness_with(notifier);
    let ack = harness
        .service
        .request_password_reset(Some("nobody@x.com"))
        .await
        .expect("acknowledged");
    assert_eq!(ack, RESET_ACKNOWLEDGEMENT);
    assert!(harness.repo.is_empty());
}

#[rstest]
#[tokio::test]
async fn forgot_password_notifies_known_accounts_and_hides_failures() {
    let mut notifier = MockPasswordResetNotifier::new();
    notifier
        .expect_notify()
        .times(1)
        .returning(|_| Err(PasswordResetNotifierError::delivery("smtp down")));
    let harness = harness_with(notifier);
    harness
        .service
        .register(&InMemorySessionManager::default(), &alice_form())
        .await
        .expect("register");

    let ack = harness
        .service
        .request_password_reset(Some("A@x.com"))
        .await
        .expect("acknowledged");
    assert_eq!(ack, RESET_ACKNOWLEDGEMENT);
}

#[rstest]
#[tokio::test]
async fn forgot_password_requires_an_email(harness: Harness) {
    let err = harness
        .service
        .request_password_reset(None)
        .await
        .expect_err("missing email");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}
