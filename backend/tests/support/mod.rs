//! Shared helpers for backend integration tests.
//!
//! Each test crate builds the production app around an in-memory user store
//! with cheap hashing parameters and drives it through `actix_web::test`.

use std::sync::Arc;

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use careportal::domain::PasswordHashing;
use careportal::inbound::http::health::HealthState;
use careportal::outbound::memory::InMemoryUserRepository;
use careportal::server::{AppDependencies, SESSION_COOKIE_NAME, build_app, build_http_state};
use serde_json::{Value, json};

/// App plus a handle on the user store behind it.
pub struct Portal {
    pub users: Arc<InMemoryUserRepository>,
    deps: AppDependencies,
}

impl Portal {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let hashing = PasswordHashing::with_cost(8, 1, 1).expect("cheap test params");
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        let deps = AppDependencies {
            health_state,
            http_state: web::Data::new(build_http_state(users.clone(), hashing)),
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
            session_ttl: Duration::minutes(5),
        };
        Self { users, deps }
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        build_app(self.deps.clone())
    }
}

pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}

pub fn registration(username: &str, email: &str, user_type: &str, password: &str) -> Value {
    json!({
        "fullName": format!("{username} Tester"),
        "email": email,
        "username": username,
        "userType": user_type,
        "contact": "0123456789",
        "password": password,
        "confirmPassword": password,
    })
}
