//! # users Routes Module
//!
//! Admin-only user management: create accounts, list them, and enroll users
//! into classes with a role.

pub mod get;
pub mod post;

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

use get::list_users;
use post::{assign_class, create_user};

/// Builds the `/users` route group.
///
/// - `GET /users` → `list_users`
/// - `POST /users` → `create_user`
/// - `POST /users/{user_id}/classes` → `assign_class`
pub fn users_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/", post(create_user))
        .route("/{user_id}/classes", post(assign_class))
        .with_state(app_state)
}
