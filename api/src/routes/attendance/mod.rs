//! # attendance Routes Module
//!
//! Attendance records for a class and date: listing, bulk marking, single
//! record removal, dashboard summary, and spreadsheet export.
//!
//! ## Structure
//! - `common.rs` — DTOs and the period-label composition shared by handlers
//! - `get.rs` — list records, summary
//! - `post.rs` — bulk marking workflow
//! - `delete.rs` — single record removal
//! - `export.rs` — xlsx export

pub mod common;
pub mod delete;
pub mod export;
pub mod get;
pub mod post;

use axum::{
    Router,
    routing::{delete, get, post},
};
use util::state::AppState;

pub use delete::delete_record;
pub use export::export_attendance;
pub use get::{list_records, summary};
pub use post::bulk_mark;

/// Builds the `/attendance` route group.
///
/// - `GET /attendance` → `list_records`
/// - `POST /attendance/bulk` → `bulk_mark`
/// - `DELETE /attendance/records/{record_id}` → `delete_record`
/// - `GET /attendance/summary` → `summary`
/// - `GET /attendance/export` → `export_attendance`
pub fn attendance_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(list_records))
        .route("/bulk", post(bulk_mark))
        .route("/records/{record_id}", delete(delete_record))
        .route("/summary", get(summary))
        .route("/export", get(export_attendance))
        .with_state(app_state)
}
