use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use common::format_validation_errors;
use db::models::user::{self, Role};

use crate::response::MessageBody;
use crate::routes::common::UserResponse;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: Option<String>,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: Option<String>,
    pub role: Option<Role>,
    #[validate(length(min = 1, message = "fingerprintId must not be empty"))]
    pub fingerprint_id: Option<String>,
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub subject: Option<String>,
}

/// POST /signup
///
/// Creates a user. Students need username, name, password and fingerprintId;
/// teachers additionally need a subject.
///
/// ### Responses
/// - `201 Created` `{"message": "User created successfully"}`
/// - `400 Bad Request` `{"message": "Missing required fields for student."}`
///   (or `... for teacher.`)
/// - `500 Internal Server Error` `{"message": "<database error>"}`, including
///   duplicate username / fingerprint violations
pub async fn signup(State(state): State<AppState>, Json(req): Json<SignupRequest>) -> Response {
    let role = req.role.unwrap_or(Role::Student);

    let base_present = req.username.is_some()
        && req.name.is_some()
        && req.password.is_some()
        && req.fingerprint_id.is_some();
    let complete = match role {
        Role::Student => base_present,
        Role::Teacher => base_present && req.subject.is_some(),
    };
    if !complete {
        let message = match role {
            Role::Student => "Missing required fields for student.",
            Role::Teacher => "Missing required fields for teacher.",
        };
        return (StatusCode::BAD_REQUEST, Json(MessageBody::new(message))).into_response();
    }

    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(MessageBody::new(format_validation_errors(&errors))),
        )
            .into_response();
    }

    let created = user::Model::create(
        state.db(),
        req.username.as_deref().unwrap_or_default(),
        req.name.as_deref().unwrap_or_default(),
        req.password.as_deref().unwrap_or_default(),
        role,
        req.fingerprint_id.as_deref().unwrap_or_default(),
        req.subject.as_deref(),
    )
    .await;

    match created {
        Ok(_) => (
            StatusCode::CREATED,
            Json(MessageBody::new("User created successfully")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageBody::new(e.to_string())),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserResponse,
}

/// POST /login
///
/// Checks credentials for the given username/role pair.
///
/// ### Responses
/// - `200 OK` `{"message": "Login successful", "user": {...}}`
/// - `401 Unauthorized` `{"message": "Invalid credentials"}`
/// - `500 Internal Server Error` `{"message": "<database error>"}`
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    match user::Model::find_by_username_and_role(state.db(), &req.username, req.role).await {
        Ok(Some(found)) if found.verify_password(&req.password) => {
            let body = LoginResponse {
                message: "Login successful".into(),
                user: UserResponse::from(found),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(_) => (
            StatusCode::UNAUTHORIZED,
            Json(MessageBody::new("Invalid credentials")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageBody::new(e.to_string())),
        )
            .into_response(),
    }
}
