use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::app::{bare_request, json_request};
use crate::helpers::{body_json, make_test_app};
use api::auth::generate_jwt;
use db::models::{school_class, user, user_class_role::Role};

#[tokio::test]
async fn admin_creates_user_and_enrolls_them() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();

    let admin = user::Model::create(&db, "us_admin", "us_admin@school.cn", "password123", true)
        .await
        .unwrap();
    let (admin_token, _) = generate_jwt(admin.id, true);
    let class = school_class::Model::create(&db, "高一(9)班", "高一").await.unwrap();

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            &admin_token,
            json!({
                "username": "s20259001",
                "email": "s20259001@school.cn",
                "password": "password123",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let user_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/users/{user_id}/classes"),
            &admin_token,
            json!({"class_id": class.id, "role": "student"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    assert!(
        user::Model::is_in_role(&db, user_id, class.id, Role::Student)
            .await
            .unwrap()
    );

    // Duplicate usernames are refused.
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            &admin_token,
            json!({
                "username": "s20259001",
                "email": "other@school.cn",
                "password": "password123",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn user_listing_supports_search() {
    let (app, state) = make_test_app().await;
    let db = state.db_clone();

    let admin = user::Model::create(&db, "us_admin2", "us_admin2@school.cn", "password123", true)
        .await
        .unwrap();
    let (admin_token, _) = generate_jwt(admin.id, true);
    for i in 0..3 {
        let username = format!("find_me_{i}");
        let email = format!("{username}@school.cn");
        user::Model::create(&db, &username, &email, "password123", false)
            .await
            .unwrap();
    }

    let resp = app
        .oneshot(bare_request("GET", "/api/users?q=find_me", &admin_token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["users"].as_array().unwrap().len(), 3);
}
