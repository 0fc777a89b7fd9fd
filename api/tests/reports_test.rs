mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;

use db::models::{
    attendance_record, session,
    user::{self, Role},
};
use helpers::{body_json, get_request, make_test_app};

#[tokio::test]
async fn teacher_session_count_honors_period_windows() {
    let (app, state) = make_test_app().await;
    let teacher = user::Model::create(
        state.db(), "mkhize", "N. Mkhize", "password", Role::Teacher, "T1", Some("Physics"),
    )
    .await
    .unwrap();

    let now = Utc::now();
    // ended 2 days ago and 10 days ago
    session::Model::close(state.db(), teacher.id, now - Duration::days(2) - Duration::hours(1), now - Duration::days(2))
        .await
        .unwrap();
    session::Model::close(state.db(), teacher.id, now - Duration::days(10) - Duration::hours(1), now - Duration::days(10))
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(get_request(&format!(
            "/teacher-sessions/{}?period=weekly",
            teacher.id
        )))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["totalLectures"], 1);

    let resp = app
        .clone()
        .oneshot(get_request(&format!(
            "/teacher-sessions/{}?period=monthly",
            teacher.id
        )))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["totalLectures"], 2);

    // default (and anything unrecognized) falls back to daily
    let resp = app
        .oneshot(get_request(&format!(
            "/teacher-sessions/{}?period=yearly",
            teacher.id
        )))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["totalLectures"], 0);
}

#[tokio::test]
async fn snapshot_includes_recent_and_never_updated_students() {
    let (app, state) = make_test_app().await;
    let db = state.db();

    user::Model::create(db, "S1", "Asha Pillay", "password", Role::Student, "F1", None)
        .await
        .unwrap();
    let stale = user::Model::create(db, "S2", "Ben Dlamini", "password", Role::Student, "F2", None)
        .await
        .unwrap();
    user::Model::create(db, "S3", "Carl Botha", "password", Role::Student, "F3", None)
        .await
        .unwrap();
    // teacher rows never appear in the snapshot
    user::Model::create(db, "mkhize", "N. Mkhize", "password", Role::Teacher, "T1", Some("Physics"))
        .await
        .unwrap();

    // S1 scanned just now; S2 long outside the weekly window
    user::Model::mark_present(db, "F1", Utc::now()).await.unwrap();
    stale
        .reset_attendance(db, Utc::now() - Duration::days(40))
        .await
        .unwrap();

    let resp = app
        .oneshot(get_request("/student-attendance?period=weekly"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;

    let usernames: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert!(usernames.contains(&"S1"));
    assert!(usernames.contains(&"S3"));
    assert!(!usernames.contains(&"S2"));
    assert!(!usernames.contains(&"mkhize"));

    // wire casing is camelCase and no password material leaks
    let first: &Value = &body.as_array().unwrap()[0];
    assert!(first.get("fingerprintId").is_some());
    assert!(first.get("passwordHash").is_none());
}

/// Pins the two carried-over quirks of the individual summary:
/// `totalLectures` counts sessions from every teacher, and
/// `attendedLectures` ignores the requested period entirely.
#[tokio::test]
async fn summary_counts_sessions_systemwide_and_attendance_unbounded() {
    let (app, state) = make_test_app().await;
    let db = state.db();

    let physics = user::Model::create(db, "mkhize", "N. Mkhize", "password", Role::Teacher, "T1", Some("Physics"))
        .await
        .unwrap();
    let history = user::Model::create(db, "naidoo", "P. Naidoo", "password", Role::Teacher, "T2", Some("History"))
        .await
        .unwrap();
    let student = user::Model::create(db, "S1", "Asha Pillay", "password", Role::Student, "F1", None)
        .await
        .unwrap();

    let now = Utc::now();
    session::Model::close(db, physics.id, now - Duration::hours(2), now - Duration::hours(1))
        .await
        .unwrap();
    session::Model::close(db, history.id, now - Duration::hours(2), now - Duration::hours(1))
        .await
        .unwrap();

    // a mark from two months ago, far outside any window
    attendance_record::Model::mark_once(db, student.id, "long-gone-handle", now - Duration::days(60))
        .await
        .unwrap();

    let resp = app
        .oneshot(get_request(&format!(
            "/student-attendance/{}?period=weekly",
            student.id
        )))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;

    // both teachers' sessions counted; no subject/teacher filter applies
    assert_eq!(body["totalLectures"], 2);
    // the ancient mark still counts
    assert_eq!(body["attendedLectures"], 1);
}
