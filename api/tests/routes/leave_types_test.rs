use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::app::{bare_request, json_request};
use crate::helpers::{body_json, make_test_app};
use api::auth::generate_jwt;
use db::models::user;

#[tokio::test]
async fn catalogue_crud_is_admin_only() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();

    let admin = user::Model::create(&db, "lt_admin", "lt_admin@school.cn", "password123", true)
        .await
        .unwrap();
    let plain = user::Model::create(&db, "lt_plain", "lt_plain@school.cn", "password123", false)
        .await
        .unwrap();
    let (admin_token, _) = generate_jwt(admin.id, true);
    let (plain_token, _) = generate_jwt(plain.id, false);

    // Non-admins cannot create.
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/leave-types",
            &plain_token,
            json!({"name": "病假", "slug": "sick", "input_type": "time"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Admin creates a type with an option schema.
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/leave-types",
            &admin_token,
            json!({
                "name": "校活动",
                "slug": "school_activity",
                "input_type": "duration_select",
                "input_config": {"options": ["morning", "afternoon"]},
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let type_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

    // Duplicate slugs are refused.
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/leave-types",
            &admin_token,
            json!({"name": "重复", "slug": "school_activity", "input_type": "none"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Update renames and swaps the input schema.
    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/leave-types/{type_id}"),
            &admin_token,
            json!({"name": "社团活动", "input_type": "text"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Everyone authenticated can read the catalogue.
    let resp = app
        .clone()
        .oneshot(bare_request("GET", "/api/leave-types", &plain_token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"][0]["name"], "社团活动");
    assert_eq!(json["data"][0]["input_type"], "text");

    // Delete removes it.
    let resp = app
        .clone()
        .oneshot(bare_request(
            "DELETE",
            &format!("/api/leave-types/{type_id}"),
            &admin_token,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(bare_request("GET", "/api/leave-types", &plain_token))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}
