use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::response::ApiResponse;
use db::models::leave_type;
use util::state::AppState;

/// DELETE `/api/leave-types/{leave_type_id}`
///
/// Remove a leave type from the catalogue.
///
/// **Auth**: Admin only (router layer).
pub async fn delete_leave_type(
    State(state): State<AppState>,
    Path(leave_type_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    match leave_type::Model::delete_by_id(state.db(), leave_type_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Leave type deleted")),
        ),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Leave type not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete leave type");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error deleting leave type")),
            )
        }
    }
}
