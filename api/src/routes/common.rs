use chrono::{DateTime, Utc};
use db::models::user::{self, AttendanceStatus, Role};
use serde::{Deserialize, Serialize};

/// A user as exposed on the wire. Mirrors the stored row minus the password
/// hash; key casing follows the dashboard's expectations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub fingerprint_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub attendance: AttendanceStatus,
    pub last_updated: Option<DateTime<Utc>>,
    pub session_open: bool,
    pub session_start: Option<DateTime<Utc>>,
    pub active_session_id: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            name: m.name,
            role: m.role,
            fingerprint_id: m.fingerprint_id,
            subject: m.subject,
            attendance: m.attendance,
            last_updated: m.last_updated,
            session_open: m.session_open,
            session_start: m.session_start,
            active_session_id: m.active_session_id,
        }
    }
}

/// Query parameters shared by the aggregation and export endpoints.
///
/// `subject` is accepted on the roster snapshot for dashboard compatibility
/// and ignored; no subject filter applies to that query.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
    #[allow(dead_code)]
    pub subject: Option<String>,
}
