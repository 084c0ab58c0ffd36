use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::response::ApiResponse;
use db::models::semester;
use util::calendar::{CalendarWeek, SemesterCalendar, ViewMode, build_grid};
use util::state::AppState;

#[derive(Debug, Serialize, Default)]
pub struct SemesterResponse {
    pub id: i64,
    pub name: String,
    pub start_date: String,
    pub total_weeks: i32,
    pub holidays: Vec<String>,
    pub current: bool,
}

impl From<semester::Model> for SemesterResponse {
    fn from(m: semester::Model) -> Self {
        let mut holidays: Vec<String> = m.holiday_set().into_iter().collect();
        holidays.sort();
        Self {
            id: m.id,
            name: m.name.clone(),
            start_date: m.start_date.to_string(),
            total_weeks: m.total_weeks,
            holidays,
            current: m.current,
        }
    }
}

/// GET `/api/semesters`
pub async fn list_semesters(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<SemesterResponse>>>) {
    match semester::Model::get_all(state.db()).await {
        Ok(semesters) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                semesters.into_iter().map(Into::into).collect(),
                "Semesters retrieved",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list semesters");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving semesters")),
            )
        }
    }
}

/// GET `/api/semesters/current`
pub async fn get_current_semester(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<SemesterResponse>>) {
    match semester::Model::get_current(state.db()).await {
        Ok(Some(current)) => (
            StatusCode::OK,
            Json(ApiResponse::success(current.into(), "Current semester retrieved")),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("No current semester configured")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load current semester");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving semester")),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// Reference date the grid is built around.
    pub date: NaiveDate,
    /// `month` (default) or `week`.
    pub view: Option<ViewMode>,
}

#[derive(Debug, Serialize, Default)]
pub struct CalendarResponse {
    pub weeks: Vec<CalendarWeek>,
}

/// GET `/api/semesters/{semester_id}/calendar`
///
/// The display grid for attendance views: whole Monday-aligned weeks, each
/// row annotated with its school week number (or the "-" sentinel outside
/// the semester), each day flagged for holidays.
pub async fn get_calendar(
    State(state): State<AppState>,
    Path(semester_id): Path<i64>,
    Query(q): Query<CalendarQuery>,
) -> (StatusCode, Json<ApiResponse<CalendarResponse>>) {
    let semester = match semester::Model::get_by_id(state.db(), semester_id).await {
        Ok(Some(semester)) => semester,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Semester not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load semester");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving semester")),
            );
        }
    };

    let calendar = SemesterCalendar::from(&semester);
    let weeks = build_grid(q.date, q.view.unwrap_or(ViewMode::Month), &calendar);

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            CalendarResponse { weeks },
            "Calendar grid built",
        )),
    )
}
