//! # schedule Routes Module
//!
//! The school day's structure: class periods and the time-slot presets built
//! on top of them. Everyone authenticated may list; only admins may change
//! the configuration.

pub mod get;
pub mod post;

use crate::auth::guards::allow_admin;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use util::state::AppState;

pub use get::{list_class_periods, list_time_slots};
pub use post::{create_class_period, create_time_slot};

/// Builds the `/class-periods` route group.
///
/// - `GET /class-periods` → `list_class_periods`
/// - `POST /class-periods` → `create_class_period` (admin)
pub fn class_period_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(list_class_periods))
        .route(
            "/",
            post(create_class_period).route_layer(from_fn(allow_admin)),
        )
        .with_state(app_state)
}

/// Builds the `/time-slots` route group.
///
/// - `GET /time-slots` → `list_time_slots`
/// - `POST /time-slots` → `create_time_slot` (admin)
pub fn time_slot_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(list_time_slots))
        .route("/", post(create_time_slot).route_layer(from_fn(allow_admin)))
        .with_state(app_state)
}
