use axum::{Router, body::Body, http::Request, response::Response};
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Once;
use tower::ServiceExt;
use tower::util::BoxCloneService;

use api::routes::routes;
use util::state::AppState;

static INIT: Once = Once::new();

/// Points the global config at test values before anything touches it.
fn init_test_env() {
    INIT.call_once(|| {
        let image_root = std::env::temp_dir().join(format!("rollbook-test-{}", std::process::id()));
        // SAFETY: runs once before any test has spawned config readers.
        unsafe {
            std::env::set_var("DATABASE_PATH", ":memory:");
            std::env::set_var("LEAVE_IMAGE_STORAGE_ROOT", &image_root);
            std::env::set_var("JWT_SECRET", "test-secret");
            std::env::set_var("JWT_DURATION_MINUTES", "60");
        }
        util::config::AppConfig::reset();
    });
}

/// A fresh app over an empty in-memory database with migrations applied.
pub async fn make_test_app() -> (BoxCloneService<Request<Body>, Response, Infallible>, AppState) {
    init_test_env();

    let db = db::test_utils::setup_test_db().await;
    let app_state = AppState::new(db);

    let router = Router::new().nest("/api", routes(app_state.clone()));
    (router.into_service().boxed_clone(), app_state)
}

/// Collects a response body into JSON.
pub async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// Builds an authorized JSON request.
pub fn json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

/// Builds an authorized bodyless request.
pub fn bare_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request builds")
}
