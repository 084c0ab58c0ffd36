use axum::http::StatusCode;
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

use crate::helpers::app::bare_request;
use crate::helpers::make_test_app;
use api::auth::generate_jwt;
use db::models::{
    attendance_record::{self, NewAttendanceRecord, SourceType, Status},
    school_class, user,
    user_class_role::{self, Role},
};

struct TestCtx {
    teacher_token: String,
    class_id: i64,
}

async fn setup(db: &DatabaseConnection) -> TestCtx {
    let class = school_class::Model::create(db, "高三(1)班", "高三").await.unwrap();

    let teacher = user::Model::create(db, "ex_teacher", "ex_teacher@school.cn", "password123", false)
        .await
        .unwrap();
    user_class_role::Model::assign_user_to_class(db, teacher.id, class.id, Role::Teacher)
        .await
        .unwrap();

    let student = user::Model::create(db, "ex_s0", "ex_s0@school.cn", "password123", false)
        .await
        .unwrap();
    user_class_role::Model::assign_user_to_class(db, student.id, class.id, Role::Student)
        .await
        .unwrap();

    attendance_record::Model::create(
        db,
        NewAttendanceRecord {
            student_id: student.id,
            class_id: class.id,
            date: NaiveDate::from_ymd_opt(2025, 9, 10).unwrap(),
            period_id: None,
            status: Status::Absent,
            leave_type_id: None,
            details: None,
            source_type: SourceType::Manual,
            source_id: None,
            approval_status: None,
            created_by: teacher.id,
        },
    )
    .await
    .unwrap();

    let (teacher_token, _) = generate_jwt(teacher.id, false);
    TestCtx {
        teacher_token,
        class_id: class.id,
    }
}

#[tokio::test]
async fn export_returns_spreadsheet_attachment() {
    let (app, state) = make_test_app().await;
    let ctx = setup(&state.db_clone()).await;

    let uri = format!(
        "/api/attendance/export?class_ids={}&from=2025-09-01&to=2025-09-30",
        ctx.class_id
    );
    let resp = app
        .oneshot(bare_request("GET", &uri, &ctx.teacher_token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.contains("spreadsheetml"));

    let disposition = resp
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("attendance_2025-09-01_2025-09-30.xlsx"));

    // xlsx files are zip containers; check the magic bytes.
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[0..2], &b"PK"[..]);
}

#[tokio::test]
async fn export_detail_format_also_produces_spreadsheet() {
    let (app, state) = make_test_app().await;
    let ctx = setup(&state.db_clone()).await;

    let uri = format!(
        "/api/attendance/export?class_ids={}&from=2025-09-01&to=2025-09-30&format=detail&scope=with_records",
        ctx.class_id
    );
    let resp = app
        .oneshot(bare_request("GET", &uri, &ctx.teacher_token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .contains("spreadsheetml")
    );
}

#[tokio::test]
async fn export_errors_come_back_as_json() {
    let (app, state) = make_test_app().await;
    let ctx = setup(&state.db_clone()).await;

    // An empty class list is a client error, surfaced as JSON rather than a
    // downloadable file.
    let resp = app
        .oneshot(bare_request(
            "GET",
            "/api/attendance/export?class_ids=&from=2025-09-01&to=2025-09-30",
            &ctx.teacher_token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .contains("application/json")
    );
}

#[tokio::test]
async fn export_forbidden_for_outsiders() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();
    let ctx = setup(&db).await;

    let outsider = user::Model::create(&db, "ex_out", "ex_out@school.cn", "password123", false)
        .await
        .unwrap();
    let (token, _) = generate_jwt(outsider.id, false);

    let uri = format!(
        "/api/attendance/export?class_ids={}&from=2025-09-01&to=2025-09-30",
        ctx.class_id
    );
    let resp = app.oneshot(bare_request("GET", &uri, &token)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
