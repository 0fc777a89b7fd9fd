use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::error;
use util::state::AppState;

use common::Period;
use db::models::user::{self, Role};

use crate::export::ReportPdf;
use crate::response::MessageBody;
use crate::routes::common::PeriodQuery;

/// Matches `encodeURIComponent`: alphanumerics plus `-`, `_`, `.`, `~` pass.
const FILENAME_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn pdf_response(name: &str, bytes: Vec<u8>) -> Response {
    let filename = utf8_percent_encode(&format!("{name}_attendance.pdf"), FILENAME_SET).to_string();
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// GET /download-pdf/{teacher_id}?period=
///
/// Renders the teacher's attendance report over the full student roster,
/// then resets every currently-present student back to absent. The reset is
/// a side effect of the export: a second download without fresh scans shows
/// an all-absent roster. Reset failures are logged and never surfaced.
///
/// ### Responses
/// - `200 OK`: PDF bytes with attachment headers
/// - `404 Not Found` `{"message": "Teacher not found."}`
/// - `500 Internal Server Error` `{"message": "<database error>"}`
pub async fn teacher_pdf(
    State(state): State<AppState>,
    Path(teacher_id): Path<i64>,
    Query(q): Query<PeriodQuery>,
) -> Response {
    let period = Period::from_param(q.period.as_deref());

    let teacher = match user::Model::find_by_id(state.db(), teacher_id).await {
        Ok(Some(t)) if t.role == Role::Teacher => t,
        Ok(_) => {
            return (
                StatusCode::NOT_FOUND,
                Json(MessageBody::new("Teacher not found.")),
            )
                .into_response();
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageBody::new(e.to_string())),
            )
                .into_response();
        }
    };

    let students = match user::Model::students_sorted(state.db()).await {
        Ok(students) => students,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageBody::new(e.to_string())),
            )
                .into_response();
        }
    };

    let roster: Vec<(String, String, String)> = students
        .into_iter()
        .map(|s| (s.name, s.username, s.attendance.to_string()))
        .collect();
    let bytes = ReportPdf::teacher_report(
        &teacher.name,
        teacher.subject.as_deref().unwrap_or_default(),
        period.label(),
        &roster,
    );

    if let Err(e) = user::Model::reset_present_students(state.db()).await {
        error!(error = %e, "Failed to reset student attendance after export");
    }

    pdf_response(&teacher.name, bytes)
}

/// GET /download-pdf/student/{student_id}?period=
///
/// Renders one student's report, then resets that student's own attendance
/// to absent regardless of the period requested. Reset failures are logged
/// and never surfaced.
///
/// ### Responses
/// - `200 OK`: PDF bytes with attachment headers
/// - `404 Not Found` `{"message": "Student not found."}`
/// - `500 Internal Server Error` `{"message": "<database error>"}`
pub async fn student_pdf(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    Query(q): Query<PeriodQuery>,
) -> Response {
    let period = Period::from_param(q.period.as_deref());

    let student = match user::Model::find_by_id(state.db(), student_id).await {
        Ok(Some(s)) if s.role == Role::Student => s,
        Ok(_) => {
            return (
                StatusCode::NOT_FOUND,
                Json(MessageBody::new("Student not found.")),
            )
                .into_response();
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageBody::new(e.to_string())),
            )
                .into_response();
        }
    };

    let bytes = ReportPdf::student_report(&student.name, period.label());

    let name = student.name.clone();
    if let Err(e) = student.reset_attendance(state.db(), Utc::now()).await {
        error!(error = %e, "Failed to reset student attendance after export");
    }

    pdf_response(&name, bytes)
}
