//! # leave_types Routes Module
//!
//! Leave type configuration: everyone authenticated may list; only admins
//! may change the catalogue.

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use crate::auth::guards::allow_admin;
use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use util::state::AppState;

pub use delete::delete_leave_type;
pub use get::list_leave_types;
pub use post::create_leave_type;
pub use put::update_leave_type;

/// Builds the `/leave-types` route group.
///
/// - `GET /leave-types` → `list_leave_types`
/// - `POST /leave-types` → `create_leave_type` (admin)
/// - `PUT /leave-types/{leave_type_id}` → `update_leave_type` (admin)
/// - `DELETE /leave-types/{leave_type_id}` → `delete_leave_type` (admin)
pub fn leave_types_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(list_leave_types))
        .route("/", post(create_leave_type).route_layer(from_fn(allow_admin)))
        .route(
            "/{leave_type_id}",
            put(update_leave_type).route_layer(from_fn(allow_admin)),
        )
        .route(
            "/{leave_type_id}",
            delete(delete_leave_type).route_layer(from_fn(allow_admin)),
        )
        .with_state(app_state)
}
