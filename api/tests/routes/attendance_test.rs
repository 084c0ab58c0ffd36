use axum::http::StatusCode;
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::app::{bare_request, json_request};
use crate::helpers::{body_json, make_test_app};
use api::auth::generate_jwt;
use db::models::{
    attendance_record::{self, NewAttendanceRecord, SourceType, Status},
    class_period, school_class, setting, time_slot, user,
    user_class_role::{self, Role},
};

struct TestCtx {
    teacher_token: String,
    student_ids: Vec<i64>,
    class_id: i64,
}

async fn setup(db: &DatabaseConnection) -> TestCtx {
    let class = school_class::Model::create(db, "高一(1)班", "高一").await.unwrap();

    let teacher = user::Model::create(db, "att_teacher", "att_teacher@school.cn", "password123", false)
        .await
        .unwrap();
    user_class_role::Model::assign_user_to_class(db, teacher.id, class.id, Role::Teacher)
        .await
        .unwrap();

    let mut student_ids = Vec::new();
    for i in 0..3 {
        let username = format!("att_s{i}");
        let email = format!("{username}@school.cn");
        let student = user::Model::create(db, &username, &email, "password123", false)
            .await
            .unwrap();
        user_class_role::Model::assign_user_to_class(db, student.id, class.id, Role::Student)
            .await
            .unwrap();
        student_ids.push(student.id);
    }

    // Eight numbered periods and the two standard slots.
    for i in 1..=8 {
        class_period::Model::create(db, &format!("第{i}节"), i).await.unwrap();
    }
    let period_rows = class_period::Model::all_ordered(db).await.unwrap();
    let ids: Vec<i64> = period_rows.iter().map(|p| p.id).collect();
    time_slot::Model::create(db, "上午", &ids[0..4]).await.unwrap();
    time_slot::Model::create(db, "下午", &ids[4..8]).await.unwrap();

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

#[tokio::test]
async fn bulk_absent_replaces_prior_marks_with_merged_record() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();
    let ctx = setup(&db).await;
    let date = day(2025, 9, 10);
    let sid = ctx.student_ids[0];

    // Prior absent marks from an earlier edit.
    for period in [3, 4] {
        attendance_record::Model::create(
            &db,
            NewAttendanceRecord {
                student_id: sid,
                class_id: ctx.class_id,
                date,
                period_id: Some(period),
                status: Status::Absent,
                leave_type_id: None,
                details: None,
                source_type: SourceType::Manual,
                source_id: None,
                approval_status: None,
                created_by: 1,
            },
        )
        .await
        .unwrap();
    }

    let body = json!({
        "class_id": ctx.class_id,
        "date": "2025-09-10",
        "student_ids": [sid],
        "status": "absent",
        "period_ids": [3, 4, 5],
    });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/attendance/bulk", &ctx.teacher_token, body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // One merged record remains, carrying every affected period.
    let records = attendance_record::Model::for_class_on(&db, ctx.class_id, date)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_details().period_ids, Some(vec![3, 4, 5]));

    // The composed label groups the consecutive run.
    let resp = app
        .oneshot(bare_request(
            "GET",
            &format!("/api/attendance?class_id={}&date=2025-09-10", ctx.class_id),
            &ctx.teacher_token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["records"][0]["period_label"], "第3-5节");
}

#[tokio::test]
async fn bulk_late_uses_default_period_when_none_selected() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();
    let ctx = setup(&db).await;

    let body = json!({
        "class_id": ctx.class_id,
        "date": "2025-09-11",
        "student_ids": [ctx.student_ids[0]],
        "status": "late",
        "time": "08:12",
    });
    let resp = app
        .oneshot(json_request("POST", "/api/attendance/bulk", &ctx.teacher_token, body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let records = attendance_record::Model::for_class_on(&db, ctx.class_id, day(2025, 9, 11))
        .await
        .unwrap();
    assert_eq!(records[0].period_id, Some(1));
    assert_eq!(records[0].record_details().time.as_deref(), Some("08:12"));
}

#[tokio::test]
async fn bulk_late_prefers_explicit_period_and_reads_setting_default() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();
    let ctx = setup(&db).await;
    setting::Model::set(&db, "early_leave_default_period", "7").await.unwrap();

    // Explicit period wins.
    let body = json!({
        "class_id": ctx.class_id,
        "date": "2025-09-12",
        "student_ids": [ctx.student_ids[0]],
        "status": "late",
        "period_id": 2,
    });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/attendance/bulk", &ctx.teacher_token, body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Early-leave default comes from settings.
    let body = json!({
        "class_id": ctx.class_id,
        "date": "2025-09-12",
        "student_ids": [ctx.student_ids[1]],
        "status": "early_leave",
    });
    let resp = app
        .oneshot(json_request("POST", "/api/attendance/bulk", &ctx.teacher_token, body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let records = attendance_record::Model::for_class_on(&db, ctx.class_id, day(2025, 9, 12))
        .await
        .unwrap();
    let late = records.iter().find(|r| r.status == Status::Late).unwrap();
    let early = records.iter().find(|r| r.status == Status::EarlyLeave).unwrap();
    assert_eq!(late.period_id, Some(2));
    assert_eq!(early.period_id, Some(7));
}

#[tokio::test]
async fn bulk_leave_requires_leave_type() {
    let (app, state) = make_test_app().await;
    let ctx = setup(&state.db_clone()).await;

    let body = json!({
        "class_id": ctx.class_id,
        "date": "2025-09-13",
        "student_ids": [ctx.student_ids[0]],
        "status": "leave",
    });
    let resp = app
        .oneshot(json_request("POST", "/api/attendance/bulk", &ctx.teacher_token, body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().contains("leave type"));
}

#[tokio::test]
async fn bulk_mark_forbidden_for_non_teacher() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();
    let ctx = setup(&db).await;

    let outsider = user::Model::create(&db, "outsider", "outsider@school.cn", "password123", false)
        .await
        .unwrap();
    let (token, _) = generate_jwt(outsider.id, false);

    let body = json!({
        "class_id": ctx.class_id,
        "date": "2025-09-14",
        "student_ids": [ctx.student_ids[0]],
        "status": "present",
    });
    let resp = app
        .oneshot(json_request("POST", "/api/attendance/bulk", &token, body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn slot_matching_selection_labels_with_slot_name() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();
    let ctx = setup(&db).await;

    let body = json!({
        "class_id": ctx.class_id,
        "date": "2025-09-15",
        "student_ids": [ctx.student_ids[0]],
        "status": "absent",
        "period_ids": [1, 2, 3, 4],
    });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/attendance/bulk", &ctx.teacher_token, body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["records"][0]["period_label"], "(上午)");
}

#[tokio::test]
async fn summary_counts_statuses_and_leave_types() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();
    let ctx = setup(&db).await;

    let sick = db::models::leave_type::Model::create(
        &db,
        "病假",
        "sick",
        db::models::leave_type::InputType::None,
        None,
    )
    .await
    .unwrap();

    for (student, status, leave_type) in [
        (ctx.student_ids[0], Status::Absent, None),
        (ctx.student_ids[1], Status::Late, None),
        (ctx.student_ids[2], Status::Leave, Some(sick.id)),
    ] {
        attendance_record::Model::create(
            &db,
            NewAttendanceRecord {
                student_id: student,
                class_id: ctx.class_id,
                date: day(2025, 9, 16),
                period_id: None,
                status,
                leave_type_id: leave_type,
                details: None,
                source_type: SourceType::Manual,
                source_id: None,
                approval_status: None,
                created_by: 1,
            },
        )
        .await
        .unwrap();
    }

    let resp = app
        .oneshot(bare_request(
            "GET",
            &format!(
                "/api/attendance/summary?class_id={}&from=2025-09-16&to=2025-09-16",
                ctx.class_id
            ),
            &ctx.teacher_token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["status_counts"]["absent"], 1);
    assert_eq!(json["data"]["status_counts"]["late"], 1);
    assert_eq!(json["data"]["status_counts"]["leave"], 1);
    assert_eq!(json["data"]["leave_type_counts"]["病假"], 1);
}

#[tokio::test]
async fn delete_record_removes_it() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();
    let ctx = setup(&db).await;

    let record = attendance_record::Model::create(
        &db,
        NewAttendanceRecord {
            student_id: ctx.student_ids[0],
            class_id: ctx.class_id,
            date: day(2025, 9, 17),
            period_id: None,
            status: Status::Present,
            leave_type_id: None,
            details: None,
            source_type: SourceType::Manual,
            source_id: None,
            approval_status: None,
            created_by: 1,
        },
    )
    .await
    .unwrap();

    let resp = app
        .oneshot(bare_request(
            "DELETE",
            &format!("/api/attendance/records/{}", record.id),
            &ctx.teacher_token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let remaining = attendance_record::Model::for_class_on(&db, ctx.class_id, day(2025, 9, 17))
        .await
        .unwrap();
    assert!(remaining.is_empty());
}
