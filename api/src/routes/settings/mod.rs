//! # settings Routes Module
//!
//! Flat key-value application settings; structured values are JSON-encoded
//! in storage and decoded on read.

pub mod get;
pub mod put;

use crate::auth::guards::allow_admin;
use axum::{Router, middleware::from_fn, routing::get, routing::put};
use util::state::AppState;

pub use get::get_settings;
pub use put::update_setting;

/// Builds the `/settings` route group.
///
/// - `GET /settings` → `get_settings`
/// - `PUT /settings/{key}` → `update_setting` (admin)
pub fn settings_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(get_settings))
        .route(
            "/{key}",
            put(update_setting).route_layer(from_fn(allow_admin)),
        )
        .with_state(app_state)
}
