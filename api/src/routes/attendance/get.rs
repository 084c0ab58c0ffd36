use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::auth::AuthUser;
use crate::auth::guards::can_manage_class;
use crate::response::ApiResponse;
use db::models::{attendance_record, leave_type};
use util::state::AppState;

use super::common::{AttendanceRecordResponse, ScheduleContext};

#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    pub class_id: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, Default)]
pub struct RecordsResponse {
    pub records: Vec<AttendanceRecordResponse>,
}

/// GET `/api/attendance`
///
/// List attendance records for a class and date.
///
/// **Auth**: a teacher of the class, or an admin.
///
/// **Query**:
/// - `class_id`
/// - `date` (ISO `YYYY-MM-DD`)
pub async fn list_records(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(q): Query<RecordsQuery>,
) -> (StatusCode, Json<ApiResponse<RecordsResponse>>) {
    let db = state.db();

    if !can_manage_class(db, &claims, q.class_id).await {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Not a teacher of this class")),
        );
    }

    let schedule = match ScheduleContext::load(db).await {
        Ok(schedule) => schedule,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load schedule configuration");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving records")),
            );
        }
    };

    match attendance_record::Model::for_class_on(db, q.class_id, q.date).await {
        Ok(records) => {
            let resp = RecordsResponse {
                records: records.iter().map(|r| schedule.response_for(r)).collect(),
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(resp, "Attendance records retrieved")),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list attendance records");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving records")),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub class_id: i64,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Serialize, Default)]
pub struct SummaryResponse {
    pub total: i64,
    /// Record counts keyed by status slug.
    pub status_counts: HashMap<String, i64>,
    /// Leave record counts keyed by leave type name.
    pub leave_type_counts: HashMap<String, i64>,
}

/// GET `/api/attendance/summary`
///
/// Dashboard aggregation for a class and inclusive date range: per-status
/// counts plus per-leave-type counts.
///
/// **Auth**: a teacher of the class, or an admin.
pub async fn summary(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(q): Query<SummaryQuery>,
) -> (StatusCode, Json<ApiResponse<SummaryResponse>>) {
    let db = state.db();

    if !can_manage_class(db, &claims, q.class_id).await {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Not a teacher of this class")),
        );
    }

    let records = match attendance_record::Model::for_class_between(db, q.class_id, q.from, q.to)
        .await
    {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load records for summary");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error building summary")),
            );
        }
    };

    let type_names: HashMap<i64, String> = leave_type::Model::get_all(db)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();

    let mut resp = SummaryResponse {
        total: records.len() as i64,
        ..Default::default()
    };
    for record in &records {
        *resp
            .status_counts
            .entry(record.status.to_string())
            .or_insert(0) += 1;
        if let Some(type_id) = record.leave_type_id {
            let name = type_names
                .get(&type_id)
                .cloned()
                .unwrap_or_else(|| format!("leave_type_{type_id}"));
            *resp.leave_type_counts.entry(name).or_insert(0) += 1;
        }
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(resp, "Attendance summary computed")),
    )
}
