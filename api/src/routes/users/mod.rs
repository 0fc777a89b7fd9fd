use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;

use get::list_users;

/// Builds the `/users` directory-dump route.
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}
