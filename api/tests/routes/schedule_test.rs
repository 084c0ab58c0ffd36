use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::app::{bare_request, json_request};
use crate::helpers::{body_json, make_test_app};
use api::auth::generate_jwt;
use db::models::{class_period, time_slot, user};

#[tokio::test]
async fn periods_and_slots_are_listed_in_display_order() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();

    // Created out of order on purpose.
    class_period::Model::create(&db, "第2节", 2).await.unwrap();
    class_period::Model::create(&db, "早读", 0).await.unwrap();
    class_period::Model::create(&db, "第1节", 1).await.unwrap();
    let rows = class_period::Model::all_ordered(&db).await.unwrap();
    time_slot::Model::create(&db, "早课", &[rows[0].id, rows[1].id])
        .await
        .unwrap();

    let user = user::Model::create(&db, "sc_user", "sc_user@school.cn", "password123", false)
        .await
        .unwrap();
    let (token, _) = generate_jwt(user.id, false);

    let resp = app
        .clone()
        .oneshot(bare_request("GET", "/api/class-periods", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["早读", "第1节", "第2节"]);

    let resp = app
        .oneshot(bare_request("GET", "/api/time-slots", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"][0]["name"], "早课");
    assert_eq!(json["data"][0]["period_ids"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn schedule_configuration_is_admin_only() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();

    let admin = user::Model::create(&db, "sc_admin", "sc_admin@school.cn", "password123", true)
        .await
        .unwrap();
    let plain = user::Model::create(&db, "sc_plain", "sc_plain@school.cn", "password123", false)
        .await
        .unwrap();
    let (admin_token, _) = generate_jwt(admin.id, true);
    let (plain_token, _) = generate_jwt(plain.id, false);

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/class-periods",
            &plain_token,
            json!({"name": "第1节", "display_order": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/class-periods",
            &admin_token,
            json!({"name": "第1节", "display_order": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let period_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/time-slots",
            &admin_token,
            json!({"name": "上午", "period_ids": [period_id]}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}
