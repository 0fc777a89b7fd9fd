use axum::{
    Json,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{info, warn};
use util::config;

use crate::response::MessageBody;

/// Process-local enrollment counter; restarts from 1 on every boot and the
/// sensor re-enrolls accordingly.
static NEXT_FINGERPRINT_ID: AtomicI64 = AtomicI64::new(1);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollBody {
    pub success: bool,
    pub fingerprint_id: i64,
}

/// POST /enroll
///
/// Allocates the next sequential fingerprint ID for sensor enrollment.
///
/// ### Responses
/// - `200 OK` `{"success": true, "fingerprintId": n}`
pub async fn enroll() -> Response {
    let id = NEXT_FINGERPRINT_ID.fetch_add(1, Ordering::SeqCst);
    info!(fingerprint_id = id, "Enrolled fingerprint");

    (
        StatusCode::OK,
        Json(EnrollBody {
            success: true,
            fingerprint_id: id,
        }),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub role: Option<String>,
}

/// POST /proxy/enroll?role=
///
/// Forwards an enrollment request to the fingerprint sensor on the local
/// network and relays its JSON response and status code.
///
/// ### Responses
/// - sensor's status and JSON body, relayed
/// - `500 Internal Server Error` `{"message": "<network error>"}`
pub async fn proxy_enroll(Query(q): Query<ProxyQuery>) -> Response {
    let url = format!(
        "http://{}:{}/enroll",
        config::sensor_host(),
        config::sensor_port()
    );
    let role = q.role.unwrap_or_default();

    let sent = reqwest::Client::new()
        .post(&url)
        .query(&[("role", role.as_str())])
        .send()
        .await;

    let resp = match sent {
        Ok(resp) => resp,
        Err(e) => {
            warn!(url = %url, error = %e, "Sensor enrollment relay failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageBody::new(e.to_string())),
            )
                .into_response();
        }
    };

    let status =
        StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match resp.json::<serde_json::Value>().await {
        Ok(body) => (status, Json(body)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageBody::new(e.to_string())),
        )
            .into_response(),
    }
}
