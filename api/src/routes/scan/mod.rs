use axum::{Router, routing::post};
use util::state::AppState;

pub mod post;

use post::scan;

/// Builds the `/scan` route: the single stateful transition of the system.
pub fn scan_routes() -> Router<AppState> {
    Router::new().route("/scan", post(scan))
}
