use axum::{body::Body, http::Request, http::StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::app::{bare_request, json_request};
use crate::helpers::{body_json, make_test_app};
use api::auth::generate_jwt;
use db::models::user;

#[tokio::test]
async fn login_returns_token_for_valid_credentials() {
    let (app, state) = make_test_app().await;
    user::Model::create(&state.db_clone(), "t001", "t001@school.cn", "password123", false)
        .await
        .unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({"username": "t001", "password": "password123"}).to_string(),
        ))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["username"], "t001");
    assert!(json["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let (app, state) = make_test_app().await;
    user::Model::create(&state.db_clone(), "t002", "t002@school.cn", "password123", false)
        .await
        .unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({"username": "t002", "password": "nope"}).to_string(),
        ))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_profile_for_bearer_token() {
    let (app, state) = make_test_app().await;
    let user = user::Model::create(&state.db_clone(), "t003", "t003@school.cn", "password123", true)
        .await
        .unwrap();
    let (token, _) = generate_jwt(user.id, user.admin);

    let resp = app
        .oneshot(bare_request("GET", "/api/auth/me", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["data"]["username"], "t003");
    assert_eq!(json["data"]["admin"], true);
}

#[tokio::test]
async fn protected_routes_require_token() {
    let (app, _state) = make_test_app().await;

    let resp = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/settings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_plain_users() {
    let (app, state) = make_test_app().await;
    let user = user::Model::create(&state.db_clone(), "t004", "t004@school.cn", "password123", false)
        .await
        .unwrap();
    let (token, _) = generate_jwt(user.id, false);

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            &token,
            json!({"username": "x123", "email": "x@school.cn", "password": "password123"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
