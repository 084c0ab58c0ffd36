use axum::http::StatusCode;
use chrono::NaiveDate;
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::app::{bare_request, json_request};
use crate::helpers::{body_json, make_test_app};
use api::auth::generate_jwt;
use db::models::{semester, user};

#[tokio::test]
async fn calendar_grid_is_whole_monday_weeks_with_week_numbers() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();

    let semester = semester::Model::create(
        &db,
        "2025秋季学期",
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        20,
        &["2025-10-01".to_string()],
        true,
    )
    .await
    .unwrap();

    let user = user::Model::create(&db, "cal_user", "cal_user@school.cn", "password123", false)
        .await
        .unwrap();
    let (token, _) = generate_jwt(user.id, false);

    let resp = app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/api/semesters/{}/calendar?date=2025-09-15&view=month", semester.id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let weeks = json["data"]["weeks"].as_array().unwrap();
    let day_count: usize = weeks.iter().map(|w| w["days"].as_array().unwrap().len()).sum();
    assert_eq!(day_count % 7, 0);
    assert_eq!(weeks[0]["days"][0]["date"], "2025-09-01");
    // The semester starts on this Monday, so the first row is school week 1.
    assert_eq!(weeks[0]["school_week"], 1);

    // Week view: exactly one row, before-semester rows get the sentinel.
    let resp = app
        .oneshot(bare_request(
            "GET",
            &format!("/api/semesters/{}/calendar?date=2025-08-20&view=week", semester.id),
            &token,
        ))
        .await
        .unwrap();
    let json = body_json(resp).await;
    let weeks = json["data"]["weeks"].as_array().unwrap();
    assert_eq!(weeks.len(), 1);
    assert!(weeks[0]["school_week"].is_null());
}

#[tokio::test]
async fn calendar_marks_holidays() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();

    let semester = semester::Model::create(
        &db,
        "2025秋季学期",
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        20,
        &["2025-10-01".to_string(), "2025-10-02".to_string()],
        true,
    )
    .await
    .unwrap();

    let user = user::Model::create(&db, "cal_user2", "cal_user2@school.cn", "password123", false)
        .await
        .unwrap();
    let (token, _) = generate_jwt(user.id, false);

    let resp = app
        .oneshot(bare_request(
            "GET",
            &format!("/api/semesters/{}/calendar?date=2025-10-01&view=week", semester.id),
            &token,
        ))
        .await
        .unwrap();
    let json = body_json(resp).await;
    let days = json["data"]["weeks"][0]["days"].as_array().unwrap();
    let holidays: Vec<&str> = days
        .iter()
        .filter(|d| d["holiday"] == true)
        .map(|d| d["date"].as_str().unwrap())
        .collect();
    assert_eq!(holidays, vec!["2025-10-01", "2025-10-02"]);
}

#[tokio::test]
async fn creating_a_current_semester_demotes_the_previous_one() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();

    let admin = user::Model::create(&db, "cal_admin", "cal_admin@school.cn", "password123", true)
        .await
        .unwrap();
    let (admin_token, _) = generate_jwt(admin.id, true);

    for (name, start) in [("2025春季学期", "2025-02-17"), ("2025秋季学期", "2025-09-01")] {
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/semesters",
                &admin_token,
                json!({
                    "name": name,
                    "start_date": start,
                    "total_weeks": 20,
                    "current": true,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = app
        .oneshot(bare_request("GET", "/api/semesters/current", &admin_token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["name"], "2025秋季学期");
}
