use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::response::ApiResponse;
use db::models::{class_period, time_slot};
use util::state::AppState;

#[derive(Debug, Serialize, Default)]
pub struct TimeSlotResponse {
    pub id: i64,
    pub name: String,
    pub period_ids: Vec<i64>,
}

impl From<time_slot::Model> for TimeSlotResponse {
    fn from(m: time_slot::Model) -> Self {
        let period_ids = m.period_id_list();
        Self {
            id: m.id,
            name: m.name,
            period_ids,
        }
    }
}

/// GET `/api/class-periods`
///
/// The configured periods in display order.
pub async fn list_class_periods(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<class_period::Model>>>) {
    match class_period::Model::all_ordered(state.db()).await {
        Ok(periods) => (
            StatusCode::OK,
            Json(ApiResponse::success(periods, "Class periods retrieved")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list class periods");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving class periods")),
            )
        }
    }
}

/// GET `/api/time-slots`
///
/// The configured time-slot presets with decoded period-ID lists.
pub async fn list_time_slots(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<TimeSlotResponse>>>) {
    match time_slot::Model::get_all(state.db()).await {
        Ok(slots) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                slots.into_iter().map(Into::into).collect(),
                "Time slots retrieved",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list time slots");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving time slots")),
            )
        }
    }
}
