use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use util::state::AppState;

use common::Period;
use db::models::{attendance_record, session, user};

use crate::response::MessageBody;
use crate::routes::common::{PeriodQuery, UserResponse};

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TotalLecturesBody {
    pub total_lectures: u64,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummaryBody {
    pub total_lectures: u64,
    pub attended_lectures: u64,
}

/// GET /teacher-sessions/{teacher_id}?period=
///
/// Counts completed sessions for one teacher whose end falls inside the
/// period window.
///
/// ### Responses
/// - `200 OK` `{"totalLectures": n}`
/// - `500 Internal Server Error` `{"message": "<database error>"}`
pub async fn teacher_session_count(
    State(state): State<AppState>,
    Path(teacher_id): Path<i64>,
    Query(q): Query<PeriodQuery>,
) -> Response {
    let threshold = Period::from_param(q.period.as_deref()).threshold(Utc::now());

    match session::Model::count_for_teacher_since(state.db(), teacher_id, threshold).await {
        Ok(total_lectures) => (
            StatusCode::OK,
            Json(TotalLecturesBody { total_lectures }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageBody::new(e.to_string())),
        )
            .into_response(),
    }
}

/// GET /student-attendance?subject&period
///
/// The teacher-dashboard roster snapshot: students whose status changed
/// inside the window, plus students that have never been updated. The
/// `subject` parameter is accepted and ignored.
///
/// ### Responses
/// - `200 OK`: a bare array of users
/// - `500 Internal Server Error` `{"message": "<database error>"}`
pub async fn student_attendance_snapshot(
    State(state): State<AppState>,
    Query(q): Query<PeriodQuery>,
) -> Response {
    let threshold = Period::from_param(q.period.as_deref()).threshold(Utc::now());

    match user::Model::students_snapshot(state.db(), threshold).await {
        Ok(students) => {
            let body: Vec<UserResponse> = students.into_iter().map(UserResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageBody::new(e.to_string())),
        )
            .into_response(),
    }
}

/// GET /student-attendance/{student_id}?period=
///
/// The individual summary. `totalLectures` counts completed sessions
/// system-wide, not filtered to the student's teachers, and
/// `attendedLectures` counts the student's presence marks over all time,
/// ignoring the requested period.
///
/// ### Responses
/// - `200 OK` `{"totalLectures": n, "attendedLectures": m}`
/// - `500 Internal Server Error` `{"message": "<database error>"}`
pub async fn student_attendance_summary(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    Query(q): Query<PeriodQuery>,
) -> Response {
    let threshold = Period::from_param(q.period.as_deref()).threshold(Utc::now());

    let total = session::Model::count_since(state.db(), threshold).await;
    let attended =
        attendance_record::Model::attended_count_for_student(state.db(), student_id).await;

    match (total, attended) {
        (Ok(total_lectures), Ok(attended_lectures)) => (
            StatusCode::OK,
            Json(AttendanceSummaryBody {
                total_lectures,
                attended_lectures,
            }),
        )
            .into_response(),
        (Err(e), _) | (_, Err(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageBody::new(e.to_string())),
        )
            .into_response(),
    }
}
