//! HTTP route entry point for `/api/...`.
//!
//! This module defines all HTTP entry points under the `/api` namespace.
//! Routes are organized by domain (attendance, roll calls, leave requests,
//! reference data), each protected via appropriate access control middleware.
//!
//! Route groups include:
//! - `/health` → Health check endpoint (public)
//! - `/auth` → Authentication endpoints (login, current user)
//! - `/users` → User management endpoints (admin-only)
//! - `/attendance` → Attendance records, bulk marking, summary, export
//! - `/roll-calls` → Live roll call sessions
//! - `/leave-requests` → Student leave applications and review
//! - `/leave-types`, `/class-periods`, `/time-slots`, `/semesters`,
//!   `/settings` → Reference data

use crate::auth::guards::{allow_admin, allow_authenticated};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod attendance;
pub mod auth;
pub mod common;
pub mod health;
pub mod leave_requests;
pub mod leave_types;
pub mod roll_calls;
pub mod schedule;
pub mod semesters;
pub mod settings;
pub mod users;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest("/auth", auth::auth_routes(app_state.clone()))
        .nest(
            "/users",
            users::users_routes(app_state.clone()).route_layer(from_fn(allow_admin)),
        )
        .nest(
            "/attendance",
            attendance::attendance_routes(app_state.clone())
                .route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/roll-calls",
            roll_calls::roll_calls_routes(app_state.clone())
                .route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/leave-requests",
            leave_requests::leave_requests_routes(app_state.clone())
                .route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/leave-types",
            leave_types::leave_types_routes(app_state.clone())
                .route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/class-periods",
            schedule::class_period_routes(app_state.clone())
                .route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/time-slots",
            schedule::time_slot_routes(app_state.clone())
                .route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/semesters",
            semesters::semesters_routes(app_state.clone())
                .route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/settings",
            settings::settings_routes(app_state).route_layer(from_fn(allow_authenticated)),
        )
}
