use axum::{Router, routing::post};
use util::state::AppState;

pub mod post;

use post::{enroll, proxy_enroll};

/// Builds the enrollment routes: the local ID counter and the sensor relay.
pub fn enroll_routes() -> Router<AppState> {
    Router::new()
        .route("/enroll", post(enroll))
        .route("/proxy/enroll", post(proxy_enroll))
}
