use axum::{Router, routing::post};
use util::state::AppState;

pub mod post;

use post::{login, signup};

/// Builds the public directory routes: `POST /signup` and `POST /login`.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}
