use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;

use get::{student_attendance_snapshot, student_attendance_summary, teacher_session_count};

/// Builds the read-only aggregation routes used by the dashboards.
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/teacher-sessions/{teacher_id}", get(teacher_session_count))
        .route("/student-attendance", get(student_attendance_snapshot))
        .route(
            "/student-attendance/{student_id}",
            get(student_attendance_summary),
        )
}
