//! # leave_requests Routes Module
//!
//! Student-submitted leave applications with image evidence, reviewed by
//! teachers or admins.
//!
//! ## Structure
//! - `common.rs` — DTOs and input-schema validation
//! - `get.rs` — listing (own requests, per-class review queues)
//! - `post.rs` — submit, upload image, approve, reject

pub mod common;
pub mod get;
pub mod post;

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub use get::list_leave_requests;
pub use post::{approve_leave_request, create_leave_request, reject_leave_request, upload_image};

/// Builds the `/leave-requests` route group.
///
/// - `GET /leave-requests` → `list_leave_requests`
/// - `POST /leave-requests` → `create_leave_request`
/// - `POST /leave-requests/images` → `upload_image`
/// - `POST /leave-requests/{request_id}/approve` → `approve_leave_request`
/// - `POST /leave-requests/{request_id}/reject` → `reject_leave_request`
pub fn leave_requests_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(list_leave_requests))
        .route("/", post(create_leave_request))
        .route("/images", post(upload_image))
        .route("/{request_id}/approve", post(approve_leave_request))
        .route("/{request_id}/reject", post(reject_leave_request))
        .with_state(app_state)
}
