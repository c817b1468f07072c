//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use serde_json::{Value, json};

use crate::domain::PasswordHashing;
use crate::inbound::http::health::HealthState;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryUserRepository;
use crate::server::{AppDependencies, SESSION_COOKIE_NAME, build_app, build_http_state};

/// Session middleware with a fresh key and the `Secure` flag off for plain
/// HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

/// HTTP state over an in-memory user store with cheap hashing parameters.
pub struct TestState {
    pub state: HttpState,
    pub users: Arc<InMemoryUserRepository>,
}

pub fn test_state() -> TestState {
    let users = Arc::new(InMemoryUserRepository::new());
    let hashing = PasswordHashing::with_cost(8, 1, 1).expect("cheap test params");
    TestState {
        state: build_http_state(users.clone(), hashing),
        users,
    }
}

/// The production app wired around `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();
    build_app(AppDependencies {
        health_state,
        http_state: web::Data::new(state),
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
        session_ttl: Duration::minutes(5),
    })
}

/// Session cookie set on `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}

/// A complete registration body; callers override individual fields.
pub fn registration_body(username: &str, email: &str, user_type: &str) -> Value {
    json!({
        "fullName": format!("{username} Example"),
        "email": email,
        "username": username,
        "userType": user_type,
        "contact": "0123456789",
        "password": "longenough1",
        "confirmPassword": "longenough1",
    })
}
