use axum::{Json, extract::State, http::StatusCode};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;
use db::models::semester;
use util::state::AppState;

use super::get::SemesterResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSemesterReq {
    #[validate(length(min = 1, message = "A name is required"))]
    pub name: String,

    pub start_date: NaiveDate,

    #[validate(range(min = 1, max = 60, message = "Total weeks must be between 1 and 60"))]
    pub total_weeks: i32,

    /// ISO `YYYY-MM-DD` strings.
    pub holidays: Option<Vec<String>>,

    pub current: Option<bool>,
}

/// POST `/api/semesters`
///
/// Create a semester; setting `current` demotes the previous one.
///
/// **Auth**: Admin only (router layer).
pub async fn create_semester(
    State(state): State<AppState>,
    Json(req): Json<CreateSemesterReq>,
) -> (StatusCode, Json<ApiResponse<SemesterResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    let holidays = req.holidays.unwrap_or_default();
    for holiday in &holidays {
        if NaiveDate::parse_from_str(holiday, "%Y-%m-%d").is_err() {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(format!("Invalid holiday date: {holiday}"))),
            );
        }
    }

    match semester::Model::create(
        state.db(),
        &req.name,
        req.start_date,
        req.total_weeks,
        &holidays,
        req.current.unwrap_or(false),
    )
    .await
    {
        Ok(created) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(created.into(), "Semester created")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to create semester: {e}"))),
        ),
    }
}
