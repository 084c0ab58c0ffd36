//! # semesters Routes Module
//!
//! Semester configuration and the calendar grid derived from it.

pub mod get;
pub mod post;

use crate::auth::guards::allow_admin;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use util::state::AppState;

pub use get::{get_calendar, get_current_semester, list_semesters};
pub use post::create_semester;

/// Builds the `/semesters` route group.
///
/// - `GET /semesters` → `list_semesters`
/// - `GET /semesters/current` → `get_current_semester`
/// - `GET /semesters/{semester_id}/calendar` → `get_calendar`
/// - `POST /semesters` → `create_semester` (admin)
pub fn semesters_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(list_semesters))
        .route("/", post(create_semester).route_layer(from_fn(allow_admin)))
        .route("/current", get(get_current_semester))
        .route("/{semester_id}/calendar", get(get_calendar))
        .with_state(app_state)
}
