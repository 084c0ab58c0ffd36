use axum::http::StatusCode;
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::app::{bare_request, json_request};
use crate::helpers::{body_json, make_test_app};
use api::auth::generate_jwt;
use db::models::{
    attendance_record, leave_type, school_class, user,
    user_class_role::{self, Role},
};

struct TestCtx {
    teacher_token: String,
    student_token: String,
    student_id: i64,
    class_id: i64,
    sick_id: i64,
    time_type_id: i64,
}

async fn setup(db: &DatabaseConnection) -> TestCtx {
    let class = school_class::Model::create(db, "初三(4)班", "初三").await.unwrap();

    let teacher = user::Model::create(db, "lr_teacher", "lr_teacher@school.cn", "password123", false)
        .await
        .unwrap();
    user_class_role::Model::assign_user_to_class(db, teacher.id, class.id, Role::Teacher)
        .await
        .unwrap();

    let student = user::Model::create(db, "lr_student", "lr_student@school.cn", "password123", false)
        .await
        .unwrap();
    user_class_role::Model::assign_user_to_class(db, student.id, class.id, Role::Student)
        .await
        .unwrap();

    let sick = leave_type::Model::create(db, "病假", "sick", leave_type::InputType::None, None)
        .await
        .unwrap();
    let time_type =
        leave_type::Model::create(db, "晚到", "late_arrival", leave_type::InputType::Time, None)
            .await
            .unwrap();

    let (teacher_token, _) = generate_jwt(teacher.id, false);
    let (student_token, _) = generate_jwt(student.id, false);
    TestCtx {
        teacher_token,
        student_token,
        student_id: student.id,
        class_id: class.id,
        sick_id: sick.id,
        time_type_id: time_type.id,
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn submit_then_approve_creates_attendance_records() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();
    let ctx = setup(&db).await;

    let body = json!({
        "class_id": ctx.class_id,
        "leave_type_id": ctx.sick_id,
        "start_date": "2025-10-08",
        "end_date": "2025-10-09",
        "reason": "发烧",
    });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/leave-requests", &ctx.student_token, body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["status"], "pending");
    let request_id = json["data"]["id"].as_i64().unwrap();

    let resp = app
        .clone()
        .oneshot(bare_request(
            "POST",
            &format!("/api/leave-requests/{request_id}/approve"),
            &ctx.teacher_token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["status"], "approved");

    // One leave record per day of the range, tagged with the request.
    let records = attendance_record::Model::for_class_between(
        &db,
        ctx.class_id,
        day(2025, 10, 8),
        day(2025, 10, 9),
    )
    .await
    .unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| {
        r.status == attendance_record::Status::Leave
            && r.source_type == attendance_record::SourceType::LeaveRequest
            && r.source_id == Some(request_id)
            && r.approval_status == Some(attendance_record::ApprovalStatus::Approved)
            && r.student_id == ctx.student_id
    }));

    // Approving twice is a lifecycle violation.
    let resp = app
        .oneshot(bare_request(
            "POST",
            &format!("/api/leave-requests/{request_id}/approve"),
            &ctx.teacher_token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submission_must_satisfy_input_schema() {
    let (app, state) = make_test_app().await;
    let ctx = setup(&state.db_clone()).await;

    // A time-typed leave without a time is rejected.
    let body = json!({
        "class_id": ctx.class_id,
        "leave_type_id": ctx.time_type_id,
        "start_date": "2025-10-10",
        "end_date": "2025-10-10",
    });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/leave-requests", &ctx.student_token, body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // With the time present it goes through.
    let body = json!({
        "class_id": ctx.class_id,
        "leave_type_id": ctx.time_type_id,
        "start_date": "2025-10-10",
        "end_date": "2025-10-10",
        "details": {"time": "09:30"},
    });
    let resp = app
        .oneshot(json_request("POST", "/api/leave-requests", &ctx.student_token, body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn reject_leaves_no_attendance_records() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();
    let ctx = setup(&db).await;

    let body = json!({
        "class_id": ctx.class_id,
        "leave_type_id": ctx.sick_id,
        "start_date": "2025-10-11",
        "end_date": "2025-10-11",
    });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/leave-requests", &ctx.student_token, body))
        .await
        .unwrap();
    let request_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

    let resp = app
        .oneshot(bare_request(
            "POST",
            &format!("/api/leave-requests/{request_id}/reject"),
            &ctx.teacher_token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["status"], "rejected");

    let records = attendance_record::Model::for_class_on(&db, ctx.class_id, day(2025, 10, 11))
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn students_cannot_review_requests() {
    let (app, state) = make_test_app().await;
    let ctx = setup(&state.db_clone()).await;

    let body = json!({
        "class_id": ctx.class_id,
        "leave_type_id": ctx.sick_id,
        "start_date": "2025-10-12",
        "end_date": "2025-10-12",
    });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/leave-requests", &ctx.student_token, body))
        .await
        .unwrap();
    let request_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

    let resp = app
        .oneshot(bare_request(
            "POST",
            &format!("/api/leave-requests/{request_id}/approve"),
            &ctx.student_token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn listing_splits_own_and_class_views() {
    let (app, state) = make_test_app().await;
    let ctx = setup(&state.db_clone()).await;

    let body = json!({
        "class_id": ctx.class_id,
        "leave_type_id": ctx.sick_id,
        "start_date": "2025-10-13",
        "end_date": "2025-10-13",
    });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/leave-requests", &ctx.student_token, body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Student sees their own submissions without a class filter.
    let resp = app
        .clone()
        .oneshot(bare_request("GET", "/api/leave-requests", &ctx.student_token))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"]["leave_requests"].as_array().unwrap().len(), 1);

    // Teacher reads the class queue, filtered by status.
    let resp = app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!(
                "/api/leave-requests?class_id={}&status=pending",
                ctx.class_id
            ),
            &ctx.teacher_token,
        ))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"]["leave_requests"].as_array().unwrap().len(), 1);

    // A student asking for the class queue is refused.
    let resp = app
        .oneshot(bare_request(
            "GET",
            &format!("/api/leave-requests?class_id={}", ctx.class_id),
            &ctx.student_token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn image_upload_stores_file_and_returns_path() {
    let (app, _state) = make_test_app().await;
    let db = _state.db_clone();
    let ctx = setup(&db).await;

    let boundary = "----rollbook-test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"note.png\"\r\nContent-Type: image/png\r\n\r\nfakepngbytes\r\n--{boundary}--\r\n"
    );

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/leave-requests/images")
        .header("Authorization", format!("Bearer {}", ctx.student_token))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(axum::body::Body::from(body))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let json = body_json(resp).await;
    let path = json["data"]["path"].as_str().unwrap();
    assert!(path.ends_with(".png"));

    let stored = std::path::Path::new(&util::config::leave_image_storage_root()).join(path);
    assert_eq!(std::fs::read(stored).unwrap(), b"fakepngbytes");
}

#[tokio::test]
async fn image_upload_rejects_unknown_extensions() {
    let (app, state) = make_test_app().await;
    let ctx = setup(&state.db_clone()).await;

    let boundary = "----rollbook-test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"run.exe\"\r\nContent-Type: application/octet-stream\r\n\r\nMZ\r\n--{boundary}--\r\n"
    );

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/leave-requests/images")
        .header("Authorization", format!("Bearer {}", ctx.student_token))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(axum::body::Body::from(body))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
