use axum::http::StatusCode;
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::app::{bare_request, json_request};
use crate::helpers::{body_json, make_test_app};
use api::auth::generate_jwt;
use db::models::{
    attendance_record, school_class, user,
    user_class_role::{self, Role},
};

struct TestCtx {
    teacher_token: String,
    student_ids: Vec<i64>,
    class_id: i64,
}

async fn setup(db: &DatabaseConnection) -> TestCtx {
    let class = school_class::Model::create(db, "高二(2)班", "高二").await.unwrap();

    let teacher = user::Model::create(db, "rc_teacher", "rc_teacher@school.cn", "password123", false)
        .await
        .unwrap();
    user_class_role::Model::assign_user_to_class(db, teacher.id, class.id, Role::Teacher)
        .await
        .unwrap();

    let mut student_ids = Vec::new();
    for i in 0..3 {
        let username = format!("rc_s{i}");
        let email = format!("{username}@school.cn");
        let student = user::Model::create(db, &username, &email, "password123", false)
            .await
            .unwrap();
        user_class_role::Model::assign_user_to_class(db, student.id, class.id, Role::Student)
            .await
            .unwrap();
        student_ids.push(student.id);
    }

    let (teacher_token, _) = generate_jwt(teacher.id, false);
    TestCtx {
        teacher_token,
        student_ids,
        class_id: class.id,
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn create_call(
    app: &mut tower::util::BoxCloneService<
        axum::http::Request<axum::body::Body>,
        axum::response::Response,
        std::convert::Infallible,
    >,
    ctx: &TestCtx,
    date: &str,
) -> i64 {
    let body = json!({
        "class_id": ctx.class_id,
        "call_type": "morning_exercise",
        "date": date,
    });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/roll-calls", &ctx.teacher_token, body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let json = body_json(resp).await;
    json["data"]["id"].as_i64().expect("id present")
}

#[tokio::test]
async fn create_seeds_pending_records_and_counts() {
    let (mut app, state) = make_test_app().await;
    let ctx = setup(&state.db_clone()).await;

    let id = create_call(&mut app, &ctx, "2025-09-20").await;

    let resp = app
        .oneshot(bare_request(
            "GET",
            &format!("/api/roll-calls/{id}"),
            &ctx.teacher_token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["data"]["roll_call"]["status"], "in_progress");
    assert_eq!(json["data"]["roll_call"]["counts"]["pending"], 3);
    assert_eq!(json["data"]["records"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn complete_writes_results_through_to_attendance() {
    let (mut app, state) = make_test_app().await;
    let db = state.db_clone();
    let ctx = setup(&db).await;

    let id = create_call(&mut app, &ctx, "2025-09-21").await;

    // Mark one absent, one on leave; the third stays pending.
    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/roll-calls/{id}/records/{}", ctx.student_ids[0]),
            &ctx.teacher_token,
            json!({"status": "absent"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/roll-calls/{id}/records/{}", ctx.student_ids[1]),
            &ctx.teacher_token,
            json!({"status": "on_leave"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(bare_request(
            "POST",
            &format!("/api/roll-calls/{id}/complete"),
            &ctx.teacher_token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let records = attendance_record::Model::for_class_on(&db, ctx.class_id, day(2025, 9, 21))
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| {
        r.source_type == attendance_record::SourceType::RollCall && r.source_id == Some(id)
    }));

    // Completing again is a lifecycle violation.
    let resp = app
        .oneshot(bare_request(
            "POST",
            &format!("/api/roll-calls/{id}/complete"),
            &ctx.teacher_token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cancel_then_restore_roundtrips_the_lifecycle() {
    let (mut app, state) = make_test_app().await;
    let db = state.db_clone();
    let ctx = setup(&db).await;

    let id = create_call(&mut app, &ctx, "2025-09-22").await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/roll-calls/{id}/records/{}", ctx.student_ids[0]),
            &ctx.teacher_token,
            json!({"status": "absent"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(bare_request(
            "POST",
            &format!("/api/roll-calls/{id}/cancel"),
            &ctx.teacher_token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["status"], "cancelled");

    let resp = app
        .clone()
        .oneshot(bare_request(
            "POST",
            &format!("/api/roll-calls/{id}/restore"),
            &ctx.teacher_token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["status"], "in_progress");

    // Marks survive cancel/restore.
    let resp = app
        .oneshot(bare_request(
            "GET",
            &format!("/api/roll-calls/{id}"),
            &ctx.teacher_token,
        ))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"]["roll_call"]["counts"]["absent"], 1);
}

#[tokio::test]
async fn marking_requires_in_progress_session() {
    let (mut app, state) = make_test_app().await;
    let ctx = setup(&state.db_clone()).await;

    let id = create_call(&mut app, &ctx, "2025-09-23").await;
    let resp = app
        .clone()
        .oneshot(bare_request(
            "POST",
            &format!("/api/roll-calls/{id}/cancel"),
            &ctx.teacher_token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/roll-calls/{id}/records/{}", ctx.student_ids[0]),
            &ctx.teacher_token,
            json!({"status": "present"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn marking_unknown_student_is_not_found() {
    let (mut app, state) = make_test_app().await;
    let ctx = setup(&state.db_clone()).await;

    let id = create_call(&mut app, &ctx, "2025-09-24").await;
    let resp = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/roll-calls/{id}/records/999999"),
            &ctx.teacher_token,
            json!({"status": "present"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
