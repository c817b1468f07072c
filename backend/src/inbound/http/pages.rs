//! Server-rendered pages and their session-based redirects.
//!
//! ```text
//! GET /                  landing page
//! GET /login             login form, or 302 /dashboard with a session
//! GET /register          registration form, or 302 /dashboard with a session
//! GET /forgot-password   reset request form
//! GET /dashboard         302 to the role dashboard, or 302 /login
//! GET /dashboard/doctor  doctor dashboard, or 302 /login
//! GET /dashboard/patient patient dashboard, or 302 /login
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};
use tracing::warn;

use crate::domain::{ErrorCode, Role, SessionManager, User, require_authenticated, require_role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Pages the portal can render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Landing,
    Login,
    Register,
    ForgotPassword,
    Dashboard(User),
}

/// Driving port for turning a [`Page`] into an HTML document.
#[cfg_attr(test, mockall::automock)]
pub trait PageRenderer: Send + Sync {
    fn render(&self, page: &Page) -> String;
}

/// Minimal built-in markup; forms post to the JSON API from the browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticPageRenderer;

impl PageRenderer for StaticPageRenderer {
    fn render(&self, page: &Page) -> String {
        let (title, body) = match page {
            Page::Landing => (
                "CarePortal".to_owned(),
                format!(
                    "<h1>CarePortal</h1><p><a href=\"{LOGIN_PATH}\">Log in</a> or \
                     <a href=\"/register\">create an account</a>.</p>"
                ),
            ),
            Page::Login => (
                "Log in".to_owned(),
                "<h1>Log in</h1><form id=\"login\" data-endpoint=\"/api/login\">\
                 <input name=\"username\" required>\
                 <input name=\"password\" type=\"password\" required>\
                 <button type=\"submit\">Log in</button></form>\
                 <p><a href=\"/forgot-password\">Forgot your password?</a></p>"
                    .to_owned(),
            ),
            Page::Register => (
                "Register".to_owned(),
                "<h1>Register</h1><form id=\"register\" data-endpoint=\"/api/register\">\
                 <input name=\"fullName\" required><input name=\"email\" type=\"email\" required>\
                 <input name=\"username\" required>\
                 <select name=\"userType\"><option value=\"patient\">Patient</option>\
                 <option value=\"doctor\">Doctor</option></select>\
                 <input name=\"contact\" required>\
                 <input name=\"password\" type=\"password\" minlength=\"10\" required>\
                 <input name=\"confirmPassword\" type=\"password\" minlength=\"10\" required>\
                 <button type=\"submit\">Register</button></form>"
                    .to_owned(),
            ),
            Page::ForgotPassword => (
                "Forgot password".to_owned(),
                "<h1>Forgot password</h1>\
                 <form id=\"forgot-password\" data-endpoint=\"/api/forgot-password\">\
                 <input name=\"email\" type=\"email\" required>\
                 <button type=\"submit\">Send reset link</button></form>"
                    .to_owned(),
            ),
            Page::Dashboard(user) => {
                let heading = match user.role() {
                    Role::Doctor => "Doctor dashboard",
                    Role::Patient => "Patient dashboard",
                };
                (
                    heading.to_owned(),
                    format!(
                        "<h1>{heading}</h1><p>Welcome, {}.</p>\
                         <form id=\"logout\" data-endpoint=\"/api/logout\">\
                         <button type=\"submit\">Log out</button></form>",
                        escape_html(user.full_name().as_ref())
                    ),
                )
            }
        };
        format!(
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
             <title>{}</title></head><body>{body}</body></html>",
            escape_html(&title)
        )
    }
}

/// Escape text for inclusion in element content or quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(body)
}

fn dashboard_path(role: Role) -> String {
    format!("{DASHBOARD_PATH}/{role}")
}

#[get("/")]
pub async fn landing(state: web::Data<HttpState>) -> HttpResponse {
    html(state.pages.render(&Page::Landing))
}

#[get("/login")]
pub async fn login_page(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    if session.current().is_some() {
        return redirect(DASHBOARD_PATH);
    }
    html(state.pages.render(&Page::Login))
}

#[get("/register")]
pub async fn register_page(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    if session.current().is_some() {
        return redirect(DASHBOARD_PATH);
    }
    html(state.pages.render(&Page::Register))
}

#[get("/forgot-password")]
pub async fn forgot_password_page(state: web::Data<HttpState>) -> HttpResponse {
    html(state.pages.render(&Page::ForgotPassword))
}

/// Send signed-in users to the dashboard for their role.
#[get("/dashboard")]
pub async fn dashboard(session: SessionContext) -> HttpResponse {
    match require_authenticated(&session) {
        Ok(current) => redirect(&dashboard_path(current.role())),
        Err(_) => redirect(LOGIN_PATH),
    }
}

#[get("/dashboard/doctor")]
pub async fn doctor_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    role_dashboard(&state, &session, Role::Doctor).await
}

#[get("/dashboard/patient")]
pub async fn patient_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    role_dashboard(&state, &session, Role::Patient).await
}

async fn role_dashboard(
    state: &HttpState,
    session: &SessionContext,
    role: Role,
) -> ApiResult<HttpResponse> {
    let Ok(current) = require_role(session, role) else {
        return Ok(redirect(LOGIN_PATH));
    };
    match state.auth.user_for(&current).await {
        Ok(user) => Ok(html(state.pages.render(&Page::Dashboard(user)))),
        Err(err) if err.code() == ErrorCode::NotFound => {
            warn!(user_id = %current.user_id(), "session refers to a missing user");
            session.destroy();
            Ok(redirect(LOGIN_PATH))
        }
        Err(err) => Err(err),
    }
}
