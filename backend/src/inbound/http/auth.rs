//! Authentication API handlers.
//!
//! ```text
//! POST /api/register        {"fullName":…,"email":…,"username":…,"userType":…,"contact":…,"password":…,"confirmPassword":…}
//! POST /api/login           {"username":"alice","password":"longenough1"}
//! POST /api/forgot-password {"email":"alice@example.com"}
//! POST /api/reset-password  {"newPassword":…,"confirmPassword":…}
//! POST /api/logout
//! ```
//!
//! Request fields are optional at the serde layer so that absent fields reach
//! domain validation and come back as `invalid_request` envelopes.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, LoginCredentials, PasswordResetForm, RegistrationForm, require_authenticated,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::SuccessResponse;

pub const REGISTERED: &str = "Registration successful!";
pub const LOGGED_IN: &str = "Login successful!";
pub const PASSWORD_CHANGED: &str = "Password reset successful!";
pub const LOGGED_OUT: &str = "Logged out successfully";

/// Registration request body for `POST /api/register`.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Alice Smith")]
    pub full_name: Option<String>,
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    #[schema(example = "alice")]
    pub username: Option<String>,
    /// `doctor` or `patient`.
    #[schema(example = "patient")]
    pub user_type: Option<String>,
    #[schema(example = "0123456789")]
    pub contact: Option<String>,
    #[schema(example = "longenough1")]
    pub password: Option<String>,
    #[schema(example = "longenough1")]
    pub confirm_password: Option<String>,
}

impl From<RegisterRequest> for RegistrationForm {
    fn from(value: RegisterRequest) -> Self {
        Self {
            full_name: value.full_name,
            email: value.email,
            username: value.username,
            user_type: value.user_type,
            contact: value.contact,
            password: value.password,
            confirm_password: value.confirm_password,
        }
    }
}

/// Login request body for `POST /api/login`.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub username: Option<String>,
    #[schema(example = "longenough1")]
    pub password: Option<String>,
}

/// Body for `POST /api/forgot-password`.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
}

/// Body for `POST /api/reset-password`.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

impl From<ResetPasswordRequest> for PasswordResetForm {
    fn from(value: ResetPasswordRequest) -> Self {
        Self {
            new_password: value.new_password,
            confirm_password: value.confirm_password,
        }
    }
}

/// Create an account and sign the new user in.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created and signed in", body = SuccessResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing, mismatched or malformed fields", body = ErrorSchema),
        (status = 409, description = "Username or email already registered", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let form = RegistrationForm::from(payload.into_inner());
    let user = state.auth.register(&session, &form).await?;
    Ok(HttpResponse::Created().json(SuccessResponse::message(REGISTERED).with_user(&user)))
}

/// Authenticate and establish a session.
///
/// Unknown usernames and wrong passwords produce the same 401 body.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SuccessResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Username or password missing", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { username, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(username.as_deref(), password.as_deref())?;
    let user = state.auth.login(&session, &credentials).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::message(LOGGED_IN).with_user(&user)))
}

/// Request a password reset link.
///
/// The acknowledgement is identical whether or not the account exists.
#[utoipa::path(
    post,
    path = "/api/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Generic acknowledgement", body = SuccessResponse),
        (status = 400, description = "Email missing", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "forgotPassword",
    security([])
)]
#[post("/forgot-password")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let ForgotPasswordRequest { email } = payload.into_inner();
    let acknowledgement = state.auth.request_password_reset(email.as_deref()).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::message(acknowledgement)))
}

/// Change the signed-in user's password.
///
/// The session is checked before the body is parsed.
#[utoipa::path(
    post,
    path = "/api/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = SuccessResponse),
        (status = 400, description = "Missing, mismatched or short password", body = ErrorSchema),
        (status = 401, description = "No active session", body = ErrorSchema),
        (status = 404, description = "Session refers to a deleted user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "resetPassword"
)]
#[post("/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Result<web::Json<ResetPasswordRequest>, actix_web::Error>,
) -> Result<HttpResponse, actix_web::Error> {
    require_authenticated(&session).map_err(Error::from)?;
    let form = PasswordResetForm::from(payload?.into_inner());
    state.auth.reset_password(&session, &form).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::message(PASSWORD_CHANGED)))
}

/// End the session. Succeeds without one.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Session cleared", body = SuccessResponse)
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    state.auth.logout(&session);
    HttpResponse::Ok().json(SuccessResponse::message(LOGGED_OUT))
}
