use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;
use db::models::leave_type::{self, InputType};
use util::state::AppState;

use super::get::LeaveTypeResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLeaveTypeReq {
    #[validate(length(min = 1, message = "A name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "A slug is required"))]
    pub slug: String,

    pub input_type: InputType,
    pub input_config: Option<serde_json::Value>,
}

/// POST `/api/leave-types`
///
/// Add a leave type to the catalogue.
///
/// **Auth**: Admin only (router layer).
pub async fn create_leave_type(
    State(state): State<AppState>,
    Json(req): Json<CreateLeaveTypeReq>,
) -> (StatusCode, Json<ApiResponse<LeaveTypeResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    let db = state.db();

    match leave_type::Model::get_by_slug(db, &req.slug).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::error("A leave type with this slug already exists")),
            );
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "Failed to check leave type slug");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error creating leave type")),
            );
        }
    }

    let input_config = req.input_config.map(|v| v.to_string());
    match leave_type::Model::create(
        db,
        &req.name,
        &req.slug,
        req.input_type,
        input_config.as_deref(),
    )
    .await
    {
        Ok(created) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(created.into(), "Leave type created")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to create leave type: {e}"))),
        ),
    }
}
