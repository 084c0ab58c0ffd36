//! # roll_calls Routes Module
//!
//! Live roll call sessions: open, mark students, then complete, cancel, or
//! restore the session.
//!
//! ## Structure
//! - `common.rs` — DTOs shared by handlers
//! - `get.rs` — list sessions, session detail
//! - `post.rs` — create, complete, cancel, restore
//! - `put.rs` — mark one student

pub mod common;
pub mod get;
pub mod post;
pub mod put;

use axum::{
    Router,
    routing::{get, post, put},
};
use util::state::AppState;

pub use get::{get_roll_call, list_roll_calls};
pub use post::{cancel_roll_call, complete_roll_call, create_roll_call, restore_roll_call};
pub use put::mark_student;

/// Builds the `/roll-calls` route group.
///
/// - `GET /roll-calls` → `list_roll_calls`
/// - `POST /roll-calls` → `create_roll_call`
/// - `GET /roll-calls/{roll_call_id}` → `get_roll_call`
/// - `PUT /roll-calls/{roll_call_id}/records/{student_id}` → `mark_student`
/// - `POST /roll-calls/{roll_call_id}/complete` → `complete_roll_call`
/// - `POST /roll-calls/{roll_call_id}/cancel` → `cancel_roll_call`
/// - `POST /roll-calls/{roll_call_id}/restore` → `restore_roll_call`
pub fn roll_calls_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(list_roll_calls))
        .route("/", post(create_roll_call))
        .route("/{roll_call_id}", get(get_roll_call))
        .route("/{roll_call_id}/records/{student_id}", put(mark_student))
        .route("/{roll_call_id}/complete", post(complete_roll_call))
        .route("/{roll_call_id}/cancel", post(cancel_roll_call))
        .route("/{roll_call_id}/restore", post(restore_roll_call))
        .with_state(app_state)
}
