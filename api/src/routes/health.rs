use axum::{Json, Router, response::IntoResponse, routing::get};
use util::state::AppState;

use crate::response::MessageBody;

/// Builds the `/health` route group: a single `GET /health` endpoint for
/// uptime checks and deployment probes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// GET /health
async fn health_check() -> impl IntoResponse {
    Json(MessageBody::new("OK"))
}

#[cfg(test)]
mod tests {
    use super::health_check;
    use axum::body::to_bytes;
    use axum::response::IntoResponse;
    use serde_json::Value;

    #[tokio::test]
    async fn health_check_returns_ok_json() {
        let response = health_check().await.into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["message"], "OK");
    }
}
