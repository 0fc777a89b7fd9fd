mod helpers;

use axum::http::StatusCode;
use tower::ServiceExt;

use db::models::{
    attendance_record,
    user::{self, AttendanceStatus, Role},
};
use helpers::{body_json, get_request, make_test_app};
use sea_orm::DatabaseConnection;

async fn seed(db: &DatabaseConnection) -> (user::Model, user::Model) {
    let teacher = user::Model::create(db, "mkhize", "N. Mkhize", "password", Role::Teacher, "T1", Some("Physics"))
        .await
        .unwrap();
    let student = user::Model::create(db, "S1", "Asha Pillay", "password", Role::Student, "F1", None)
        .await
        .unwrap();
    (teacher, student)
}

#[tokio::test]
async fn fingerprint_lookups_resolve_roles() {
    let (app, state) = make_test_app().await;
    seed(state.db()).await;

    let resp = app
        .clone()
        .oneshot(get_request("/get-teacher-subject?fingerprintId=T1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["subject"], "Physics");

    let resp = app
        .clone()
        .oneshot(get_request("/get-student-details?fingerprintId=F1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["username"], "S1");

    let resp = app
        .clone()
        .oneshot(get_request("/get-user?fingerprintId=T1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["role"], "teacher");
    assert_eq!(body["username"], "mkhize");

    let resp = app
        .oneshot(get_request("/get-user?fingerprintId=F1"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["role"], "student");
}

#[tokio::test]
async fn lookups_with_wrong_or_unknown_fingerprints_are_not_found() {
    let (app, state) = make_test_app().await;
    seed(state.db()).await;

    // a student fingerprint is not a teacher
    let resp = app
        .clone()
        .oneshot(get_request("/get-teacher-subject?fingerprintId=F1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "Teacher not found");

    let resp = app
        .clone()
        .oneshot(get_request("/get-student-details?fingerprintId=T1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "Student not found");

    let resp = app
        .oneshot(get_request("/get-user?fingerprintId=unknown"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "User not found");
}

#[tokio::test]
async fn update_session_forces_the_flag_both_ways() {
    let (app, state) = make_test_app().await;
    let (teacher, _) = seed(state.db()).await;

    let resp = app
        .clone()
        .oneshot(get_request("/update-session?fingerprintId=T1&active=1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Session updated");
    assert_eq!(body["active"], true);

    let opened = user::Model::find_by_id(state.db(), teacher.id).await.unwrap().unwrap();
    assert!(opened.session_open);
    assert!(opened.session_start.is_some());
    assert!(opened.active_session_id.is_some());

    let resp = app
        .clone()
        .oneshot(get_request("/update-session?fingerprintId=T1&active=0"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["active"], false);

    let closed = user::Model::find_by_id(state.db(), teacher.id).await.unwrap().unwrap();
    assert!(!closed.session_open);
    assert_eq!(closed.session_start, None);
    assert_eq!(closed.active_session_id, None);

    let resp = app
        .oneshot(get_request("/update-session?fingerprintId=F1&active=1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_attendance_marks_without_a_session_or_a_record() {
    let (app, state) = make_test_app().await;
    let (_, student) = seed(state.db()).await;

    // no session open anywhere; the override path does not care
    let resp = app
        .clone()
        .oneshot(get_request("/update-attendance?fingerprintId=F1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Attendance updated");
    assert_eq!(body["username"], "S1");

    let marked = user::Model::find_by_id(state.db(), student.id).await.unwrap().unwrap();
    assert_eq!(marked.attendance, AttendanceStatus::Present);
    assert!(marked.last_updated.is_some());

    // unlike a scan, no attendance record is appended
    let records = attendance_record::Model::attended_count_for_student(state.db(), student.id)
        .await
        .unwrap();
    assert_eq!(records, 0);

    let resp = app
        .oneshot(get_request("/update-attendance?fingerprintId=T1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn device_forced_session_feeds_the_scan_path() {
    let (app, state) = make_test_app().await;
    let (_, student) = seed(state.db()).await;

    app.clone()
        .oneshot(get_request("/update-session?fingerprintId=T1&active=1"))
        .await
        .unwrap();

    let resp = app
        .oneshot(helpers::json_request(
            "POST",
            "/scan",
            serde_json::json!({ "fingerprintId": "F1" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let records = attendance_record::Model::attended_count_for_student(state.db(), student.id)
        .await
        .unwrap();
    assert_eq!(records, 1);
}

#[tokio::test]
async fn unmatched_paths_serve_the_landing_page() {
    let (app, _state) = make_test_app().await;

    let resp = app
        .clone()
        .oneshot(get_request("/definitely-not-a-route"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));

    let resp = app.oneshot(get_request("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
