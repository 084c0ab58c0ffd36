use axum::{body::Body, http::Request, http::StatusCode};
use tower::ServiceExt;

use crate::helpers::{body_json, make_test_app};

#[tokio::test]
async fn health_check_is_public() {
    let (app, _state) = make_test_app().await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"], "OK");
}
