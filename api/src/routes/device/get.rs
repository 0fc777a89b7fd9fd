use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use util::state::AppState;

use db::models::user::{self, Role};

use crate::response::MessageBody;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceQuery {
    pub fingerprint_id: Option<String>,
    /// `"1"` opens the session on `/update-session`; anything else closes it.
    pub active: Option<String>,
}

impl DeviceQuery {
    fn fingerprint(&self) -> &str {
        self.fingerprint_id.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct SubjectBody {
    pub subject: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UsernameBody {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct RoleUsernameBody {
    pub role: Role,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct SessionUpdatedBody {
    pub message: String,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct AttendanceUpdatedBody {
    pub message: String,
    pub username: String,
}

/// GET /get-teacher-subject?fingerprintId=
///
/// ### Responses
/// - `200 OK` `{"subject": "..."}`
/// - `404 Not Found` `{"message": "Teacher not found"}`
pub async fn get_teacher_subject(
    State(state): State<AppState>,
    Query(q): Query<DeviceQuery>,
) -> Response {
    match user::Model::find_by_fingerprint_and_role(state.db(), q.fingerprint(), Role::Teacher)
        .await
    {
        Ok(Some(teacher)) => (
            StatusCode::OK,
            Json(SubjectBody {
                subject: teacher.subject,
            }),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(MessageBody::new("Teacher not found")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageBody::new(e.to_string())),
        )
            .into_response(),
    }
}

/// GET /get-student-details?fingerprintId=
///
/// ### Responses
/// - `200 OK` `{"username": "..."}`
/// - `404 Not Found` `{"message": "Student not found"}`
pub async fn get_student_details(
    State(state): State<AppState>,
    Query(q): Query<DeviceQuery>,
) -> Response {
    match user::Model::find_by_fingerprint_and_role(state.db(), q.fingerprint(), Role::Student)
        .await
    {
        Ok(Some(student)) => (
            StatusCode::OK,
            Json(UsernameBody {
                username: student.username,
            }),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(MessageBody::new("Student not found")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageBody::new(e.to_string())),
        )
            .into_response(),
    }
}

/// GET /get-user?fingerprintId=
///
/// ### Responses
/// - `200 OK` `{"role": "...", "username": "..."}`
/// - `404 Not Found` `{"message": "User not found"}`
/// - `500 Internal Server Error` `{"message": "<database error>"}`
pub async fn get_user(State(state): State<AppState>, Query(q): Query<DeviceQuery>) -> Response {
    match user::Model::find_by_fingerprint(state.db(), q.fingerprint()).await {
        Ok(Some(found)) => (
            StatusCode::OK,
            Json(RoleUsernameBody {
                role: found.role,
                username: found.username,
            }),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(MessageBody::new("User not found")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageBody::new(e.to_string())),
        )
            .into_response(),
    }
}

/// GET /update-session?fingerprintId=&active=
///
/// Override path: unconditionally force a teacher's session open (fresh
/// start time and handle) or closed. Bypasses the engine and its
/// single-open-session check.
///
/// ### Responses
/// - `200 OK` `{"message": "Session updated", "active": bool}`
/// - `404 Not Found` `{"message": "Teacher not found"}`
/// - `500 Internal Server Error` `{"message": "<database error>"}`
pub async fn update_session(
    State(state): State<AppState>,
    Query(q): Query<DeviceQuery>,
) -> Response {
    let active = q.active.as_deref() == Some("1");

    match user::Model::set_session_state(state.db(), q.fingerprint(), active, Utc::now()).await {
        Ok(Some(teacher)) => (
            StatusCode::OK,
            Json(SessionUpdatedBody {
                message: "Session updated".into(),
                active: teacher.session_open,
            }),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(MessageBody::new("Teacher not found")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageBody::new(e.to_string())),
        )
            .into_response(),
    }
}

/// GET /update-attendance?fingerprintId=
///
/// Override path: mark one student present with no open-session guard and
/// no attendance record.
///
/// ### Responses
/// - `200 OK` `{"message": "Attendance updated", "username": "..."}`
/// - `404 Not Found` `{"message": "Student not found"}`
/// - `500 Internal Server Error` `{"message": "<database error>"}`
pub async fn update_attendance(
    State(state): State<AppState>,
    Query(q): Query<DeviceQuery>,
) -> Response {
    match user::Model::mark_present(state.db(), q.fingerprint(), Utc::now()).await {
        Ok(Some(student)) => (
            StatusCode::OK,
            Json(AttendanceUpdatedBody {
                message: "Attendance updated".into(),
                username: student.username,
            }),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(MessageBody::new("Student not found")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageBody::new(e.to_string())),
        )
            .into_response(),
    }
}
