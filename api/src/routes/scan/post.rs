use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use util::state::AppState;

use db::attendance_engine::{ScanError, ScanOutcome};

use crate::response::MessageBody;
use crate::routes::common::UserResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub fingerprint_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionOpenedBody {
    pub message: String,
    pub subject: String,
}

#[derive(Debug, Serialize)]
pub struct MarkedBody {
    pub message: String,
    pub user: UserResponse,
}

/// POST /scan
///
/// Runs the attendance engine for the scanned fingerprint. A teacher scan
/// opens a session (or closes the one that teacher holds); a student scan
/// marks presence inside the currently open session.
///
/// ### Responses
/// - `200 OK` `{"message": "Attendance session started. Subject: ...", "subject": "..."}`
/// - `200 OK` `{"message": "Attendance session ended."}`
/// - `200 OK` `{"message": "Attendance updated for student. Roll No: ...", "user": {...}}`
/// - `400 Bad Request` `{"message": "Missing fingerprintId"}`
/// - `403 Forbidden`: rival teacher's session, or no session open for a student
/// - `404 Not Found` `{"message": "No match found"}`
/// - `500 Internal Server Error` `{"message": "<database error>"}`
pub async fn scan(State(state): State<AppState>, Json(req): Json<ScanRequest>) -> Response {
    let Some(fingerprint_id) = req.fingerprint_id.filter(|id| !id.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(MessageBody::new("Missing fingerprintId")),
        )
            .into_response();
    };

    match state.engine().scan(&fingerprint_id, Utc::now()).await {
        Ok(ScanOutcome::SessionOpened { subject }) => {
            let body = SessionOpenedBody {
                message: format!("Attendance session started. Subject: {subject}"),
                subject,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(ScanOutcome::SessionClosed) => (
            StatusCode::OK,
            Json(MessageBody::new("Attendance session ended.")),
        )
            .into_response(),
        Ok(ScanOutcome::Marked { student }) => {
            let body = MarkedBody {
                message: format!(
                    "Attendance updated for student. Roll No: {}",
                    student.username
                ),
                user: UserResponse::from(student),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            let status = match &e {
                ScanError::UnknownFingerprint => StatusCode::NOT_FOUND,
                ScanError::RivalSession | ScanError::NoOpenSession => StatusCode::FORBIDDEN,
                ScanError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(MessageBody::new(e.to_string()))).into_response()
        }
    }
}
