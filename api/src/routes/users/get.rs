use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use util::state::AppState;

use db::models::user;

use crate::response::MessageBody;
use crate::routes::common::UserResponse;

#[derive(Debug, Serialize)]
pub struct UsersBody {
    pub users: Vec<UserResponse>,
}

/// GET /users
///
/// Dumps the full directory for the admin dashboard.
///
/// ### Responses
/// - `200 OK` `{"users": [...]}`
/// - `500 Internal Server Error` `{"message": "<database error>"}`
pub async fn list_users(State(state): State<AppState>) -> Response {
    match user::Model::list_all(state.db()).await {
        Ok(users) => {
            let body = UsersBody {
                users: users.into_iter().map(UserResponse::from).collect(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageBody::new(e.to_string())),
        )
            .into_response(),
    }
}
