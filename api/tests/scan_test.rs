mod helpers;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;
use tower::ServiceExt;

use db::models::{
    attendance_record, session,
    user::{self, AttendanceStatus, Role},
};
use helpers::{body_json, json_request, make_test_app};
use sea_orm::DatabaseConnection;

async fn seed(db: &DatabaseConnection) -> (user::Model, user::Model, user::Model, user::Model) {
    let teacher = user::Model::create(db, "mkhize", "N. Mkhize", "password", Role::Teacher, "T1", Some("Physics"))
        .await
        .unwrap();
    let rival = user::Model::create(db, "naidoo", "P. Naidoo", "password", Role::Teacher, "T2", Some("History"))
        .await
        .unwrap();
    let student_a = user::Model::create(db, "S1", "Asha Pillay", "password", Role::Student, "F1", None)
        .await
        .unwrap();
    let student_b = user::Model::create(db, "S2", "Ben Dlamini", "password", Role::Student, "F2", None)
        .await
        .unwrap();
    (teacher, rival, student_a, student_b)
}

fn scan_body(fingerprint_id: &str) -> serde_json::Value {
    json!({ "fingerprintId": fingerprint_id })
}

#[tokio::test]
async fn scan_without_fingerprint_is_rejected() {
    let (app, _state) = make_test_app().await;

    let resp = app
        .oneshot(json_request("POST", "/scan", json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert_eq!(body["message"], "Missing fingerprintId");
}

#[tokio::test]
async fn scan_with_unknown_fingerprint_is_not_found() {
    let (app, state) = make_test_app().await;
    seed(state.db()).await;

    let resp = app
        .oneshot(json_request("POST", "/scan", scan_body("does-not-exist")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = body_json(resp).await;
    assert_eq!(body["message"], "No match found");
}

#[tokio::test]
async fn full_session_lifecycle_over_http() {
    let (app, state) = make_test_app().await;
    let (teacher, _, student_a, student_b) = seed(state.db()).await;

    // Teacher T scans: session opens, subject returned.
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/scan", scan_body("T1")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Attendance session started. Subject: Physics");
    assert_eq!(body["subject"], "Physics");

    // Student S1 scans: marked present with the exact roster message.
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/scan", scan_body("F1")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Attendance updated for student. Roll No: S1");
    assert_eq!(body["user"]["attendance"], "present");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());

    // Only the scanning student was marked.
    let untouched = user::Model::find_by_id(state.db(), student_b.id).await.unwrap().unwrap();
    assert_eq!(untouched.attendance, AttendanceStatus::Absent);

    // Teacher T scans again: session closes, exactly one historical row.
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/scan", scan_body("T1")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Attendance session ended.");

    let sessions = session::Model::count_for_teacher_since(
        state.db(),
        teacher.id,
        Utc::now() - chrono::Duration::hours(1),
    )
    .await
    .unwrap();
    assert_eq!(sessions, 1);

    // S1's record survives the close.
    let attended = attendance_record::Model::attended_count_for_student(state.db(), student_a.id)
        .await
        .unwrap();
    assert_eq!(attended, 1);
}

#[tokio::test]
async fn student_scan_without_session_is_forbidden() {
    let (app, state) = make_test_app().await;
    let (_, _, student_a, _) = seed(state.db()).await;

    let resp = app
        .oneshot(json_request("POST", "/scan", scan_body("F1")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body = body_json(resp).await;
    assert_eq!(
        body["message"],
        "Attendance session not open. Please wait for a teacher to start a session."
    );

    let records = attendance_record::Model::attended_count_for_student(state.db(), student_a.id)
        .await
        .unwrap();
    assert_eq!(records, 0);
}

#[tokio::test]
async fn rival_teacher_is_rejected_and_nothing_changes() {
    let (app, state) = make_test_app().await;
    let (teacher, rival, _, _) = seed(state.db()).await;

    app.clone()
        .oneshot(json_request("POST", "/scan", scan_body("T1")))
        .await
        .unwrap();

    let resp = app
        .oneshot(json_request("POST", "/scan", scan_body("T2")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_json(resp).await;
    assert_eq!(
        body["message"],
        "Another teacher's session is active. You cannot start or end a session."
    );

    // The holder keeps the session; the rival gained nothing.
    let holder = user::Model::find_teacher_with_open_session(state.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(holder.id, teacher.id);
    let rival = user::Model::find_by_id(state.db(), rival.id).await.unwrap().unwrap();
    assert!(!rival.session_open);
}

#[tokio::test]
async fn opening_a_session_resets_the_whole_roster() {
    let (app, state) = make_test_app().await;
    let (_, _, student_a, student_b) = seed(state.db()).await;

    // Stale presence from an earlier window.
    user::Model::mark_present(state.db(), "F1", Utc::now()).await.unwrap();
    user::Model::mark_present(state.db(), "F2", Utc::now()).await.unwrap();

    app.oneshot(json_request("POST", "/scan", scan_body("T1")))
        .await
        .unwrap();

    for id in [student_a.id, student_b.id] {
        let student = user::Model::find_by_id(state.db(), id).await.unwrap().unwrap();
        assert_eq!(student.attendance, AttendanceStatus::Absent);
    }
}
