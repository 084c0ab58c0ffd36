use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::DbErr;
use serde::Deserialize;
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;
use db::models::leave_type::{self, InputType};
use util::state::AppState;

use super::get::LeaveTypeResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLeaveTypeReq {
    #[validate(length(min = 1, message = "A name is required"))]
    pub name: String,

    pub input_type: InputType,
    pub input_config: Option<serde_json::Value>,
}

/// PUT `/api/leave-types/{leave_type_id}`
///
/// Update a leave type's name and input schema. The slug is immutable: it
/// is what existing records and clients key on.
///
/// **Auth**: Admin only (router layer).
pub async fn update_leave_type(
    State(state): State<AppState>,
    Path(leave_type_id): Path<i64>,
    Json(req): Json<UpdateLeaveTypeReq>,
) -> (StatusCode, Json<ApiResponse<LeaveTypeResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    let input_config = req.input_config.map(|v| v.to_string());
    match leave_type::Model::update(
        state.db(),
        leave_type_id,
        &req.name,
        req.input_type,
        input_config.as_deref(),
    )
    .await
    {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(updated.into(), "Leave type updated")),
        ),
        Err(DbErr::RecordNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Leave type not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to update leave type");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error updating leave type")),
            )
        }
    }
}
