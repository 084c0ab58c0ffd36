use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;
use db::models::{class_period, time_slot};
use util::state::AppState;

use super::get::TimeSlotResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassPeriodReq {
    #[validate(length(min = 1, message = "A name is required"))]
    pub name: String,
    pub display_order: i32,
}

/// POST `/api/class-periods`
///
/// Add a period to the school day.
///
/// **Auth**: Admin only (router layer).
pub async fn create_class_period(
    State(state): State<AppState>,
    Json(req): Json<CreateClassPeriodReq>,
) -> (StatusCode, Json<ApiResponse<Option<class_period::Model>>>) {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    match class_period::Model::create(state.db(), &req.name, req.display_order).await {
        Ok(period) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(period), "Class period created")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to create class period: {e}"))),
        ),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTimeSlotReq {
    #[validate(length(min = 1, message = "A name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "At least one period is required"))]
    pub period_ids: Vec<i64>,
}

/// POST `/api/time-slots`
///
/// Add a time-slot preset grouping existing periods.
///
/// **Auth**: Admin only (router layer).
pub async fn create_time_slot(
    State(state): State<AppState>,
    Json(req): Json<CreateTimeSlotReq>,
) -> (StatusCode, Json<ApiResponse<TimeSlotResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    match time_slot::Model::create(state.db(), &req.name, &req.period_ids).await {
        Ok(slot) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(slot.into(), "Time slot created")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to create time slot: {e}"))),
        ),
    }
}
