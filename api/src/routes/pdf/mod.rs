use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;

use get::{student_pdf, teacher_pdf};

/// Builds the report-export routes. Both exports reset attendance state
/// after rendering; see the handler docs.
pub fn pdf_routes() -> Router<AppState> {
    Router::new()
        .route("/download-pdf/{teacher_id}", get(teacher_pdf))
        .route("/download-pdf/student/{student_id}", get(student_pdf))
}
