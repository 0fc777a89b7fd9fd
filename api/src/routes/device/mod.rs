//! Device-integration surface.
//!
//! The fingerprint hardware drives these endpoints directly: fingerprint
//! lookups for its display, plus two override endpoints (`/update-session`,
//! `/update-attendance`) that write session and attendance state WITHOUT
//! going through the attendance engine. The overrides skip the
//! single-open-session check and the open-session guard on purpose (they are
//! the hardware's recovery path), which is why they live in their own group
//! instead of next to `/scan`.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;

use get::{get_student_details, get_teacher_subject, get_user, update_attendance, update_session};

pub fn device_routes() -> Router<AppState> {
    Router::new()
        .route("/get-teacher-subject", get(get_teacher_subject))
        .route("/get-student-details", get(get_student_details))
        .route("/get-user", get(get_user))
        .route("/update-session", get(update_session))
        .route("/update-attendance", get(update_attendance))
}
