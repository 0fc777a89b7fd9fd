//! HTTP route entry point.
//!
//! Route groups:
//! - `/signup`, `/login` → directory management (public)
//! - `/scan` → the attendance engine transition
//! - `/teacher-sessions`, `/student-attendance` → aggregation queries
//! - `/enroll`, `/proxy/enroll` → fingerprint enrollment (local counter + sensor relay)
//! - `/download-pdf` → report exports with their post-export roster reset
//! - `/users` → directory dump
//! - `/get-*`, `/update-*` → device integration lookups and the two
//!   engine-bypassing override endpoints
//! - `/health` → liveness probe
//! - `/` and anything unmatched → embedded landing page

use axum::{Router, routing::get};
use util::state::AppState;

pub mod auth;
pub mod common;
pub mod device;
pub mod enroll;
pub mod health;
pub mod landing;
pub mod pdf;
pub mod reports;
pub mod scan;
pub mod users;

/// Builds the complete application router for all HTTP endpoints.
///
/// Paths are mounted at the root (no `/api` prefix): the sensor firmware and
/// the dashboard both address the service with bare paths.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .merge(auth::auth_routes())
        .merge(scan::scan_routes())
        .merge(reports::report_routes())
        .merge(enroll::enroll_routes())
        .merge(pdf::pdf_routes())
        .merge(users::user_routes())
        .merge(device::device_routes())
        .route("/", get(landing::landing_page))
        .fallback(landing::landing_page)
        .with_state(app_state)
}
