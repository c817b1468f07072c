//! Current-user API handler and the user wire shape.
//!
//! ```text
//! GET /api/user
//! ```

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::User;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Public view of a user. Password material is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "Alice Smith")]
    pub full_name: String,
    #[schema(example = "patient")]
    pub user_type: String,
    #[schema(example = "0123456789")]
    pub contact: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            full_name: user.full_name().to_string(),
            user_type: user.role().as_str().to_owned(),
            contact: user.contact().to_string(),
        }
    }
}

/// Success envelope shared by the JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    /// Always `true`.
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Login successful!")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

impl SuccessResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            user: None,
        }
    }

    pub fn with_user(mut self, user: &User) -> Self {
        self.user = Some(UserResponse::from(user));
        self
    }

    pub fn user(user: &User) -> Self {
        Self {
            success: true,
            message: None,
            user: Some(UserResponse::from(user)),
        }
    }
}

/// Return the signed-in user.
#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "Current user", body = SuccessResponse),
        (status = 401, description = "No active session", body = ErrorSchema),
        (status = 404, description = "Session refers to a deleted user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/user")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = state.auth.current_user(&session).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::user(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ContactNumber, EmailAddress, FullName, Role, UserId, UserProfile, Username,
    };
    use serde_json::{Value, json};

    fn alice() -> User {
        User::new(
            UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id"),
            UserProfile {
                username: Username::new("alice").expect("username"),
                email: EmailAddress::new("alice@example.com").expect("email"),
                full_name: FullName::new("Alice Smith").expect("full name"),
                role: Role::Patient,
                contact: ContactNumber::new("0123456789").expect("contact"),
            },
        )
    }

    #[test]
    fn user_response_uses_snake_case_wire_names() {
        let value = serde_json::to_value(UserResponse::from(&alice())).expect("serialise");
        assert_eq!(
            value,
            json!({
                "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                "username": "alice",
                "email": "alice@example.com",
                "full_name": "Alice Smith",
                "user_type": "patient",
                "contact": "0123456789",
            })
        );
    }

    #[test]
    fn message_only_envelope_omits_user() {
        let value: Value =
            serde_json::to_value(SuccessResponse::message("Logged out successfully"))
                .expect("serialise");
        assert_eq!(
            value,
            json!({ "success": true, "message": "Logged out successfully" })
        );
    }

    #[test]
    fn user_envelope_never_carries_password_fields() {
        let text = serde_json::to_string(&SuccessResponse::message("ok").with_user(&alice()))
            .expect("serialise");
        assert!(!text.contains("password"));
    }
}
