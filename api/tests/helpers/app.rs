use api::routes::routes;
use axum::{
    body::Body,
    http::Request,
    response::Response,
};
use serde_json::Value;
use std::convert::Infallible;
use tower::ServiceExt;
use tower::util::BoxCloneService;
use util::state::AppState;

/// Builds the full router over a fresh in-memory database.
///
/// Each call gets its own database, so tests are independent; the returned
/// `AppState` gives direct model access for seeding and assertions.
pub async fn make_test_app() -> (BoxCloneService<Request<Body>, Response, Infallible>, AppState) {
    let db = db::test_utils::setup_test_db().await;
    let app_state = AppState::new(db);
    let app = routes(app_state.clone()).boxed_clone();
    (app, app_state)
}

/// Some tests exercise config-reading paths; give the global config a
/// database URL before it is first loaded.
#[allow(dead_code)]
pub fn ensure_test_env() {
    if std::env::var("DATABASE_URL").is_err() {
        unsafe { std::env::set_var("DATABASE_URL", "sqlite::memory:") };
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
