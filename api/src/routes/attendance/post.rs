use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::auth::guards::can_manage_class;
use crate::response::ApiResponse;
use db::models::{
    attendance_record::{self, NewAttendanceRecord, RecordDetails, SourceType, Status},
    leave_type, setting,
};
use util::state::AppState;

use super::common::{AttendanceRecordResponse, ScheduleContext};

/// Bulk marking payload: a set of students, one action, and the action's
/// optional extra inputs.
#[derive(Debug, Deserialize)]
pub struct BulkMarkRequest {
    pub class_id: i64,
    pub date: NaiveDate,
    pub student_ids: Vec<i64>,
    pub status: Status,
    pub leave_type_id: Option<i64>,
    /// Explicit single period for late / early-leave marks.
    pub period_id: Option<i64>,
    /// Affected periods for absent marks.
    pub period_ids: Option<Vec<i64>>,
    pub time: Option<String>,
    pub option: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, serde::Serialize, Default)]
pub struct BulkMarkResponse {
    pub records: Vec<AttendanceRecordResponse>,
}

/// POST `/api/attendance/bulk`
///
/// The bulk-update workflow: applies one status to a set of students for a
/// date.
///
/// **Auth**: a teacher of the class, or an admin.
///
/// **Semantics**:
/// - `absent` with periods: prior absent marks for the affected students on
///   that date are replaced by one merged record each (all periods stored in
///   `details.period_ids`); delete and insert run in one transaction.
/// - `late` / `early_leave`: a single relevant period — the explicit
///   `period_id` when given, otherwise the configured default
///   (`late_default_period` / `early_leave_default_period` settings).
/// - `leave` requires `leave_type_id`.
/// - anything else records a whole-day mark.
pub async fn bulk_mark(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<BulkMarkRequest>,
) -> (StatusCode, Json<ApiResponse<BulkMarkResponse>>) {
    let db = state.db();

    if !can_manage_class(db, &claims, req.class_id).await {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Not a teacher of this class")),
        );
    }
    if req.student_ids.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("No students selected")),
        );
    }

    let result = match req.status {
        Status::Absent => mark_absent(db, &req, claims.sub).await,
        Status::Late | Status::EarlyLeave => mark_single_period(db, &req, claims.sub).await,
        Status::Leave => mark_leave(db, &req, claims.sub).await,
        _ => mark_whole_day(db, &req, claims.sub).await,
    };

    let records = match result {
        Ok(records) => records,
        Err(MarkError::Invalid(message)) => {
            return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)));
        }
        Err(MarkError::Db(e)) => {
            tracing::error!(error = %e, "Bulk attendance update failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to record attendance")),
            );
        }
    };

    let schedule = match ScheduleContext::load(db).await {
        Ok(schedule) => schedule,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load schedule configuration");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to record attendance")),
            );
        }
    };

    let resp = BulkMarkResponse {
        records: records.iter().map(|r| schedule.response_for(r)).collect(),
    };
    (
        StatusCode::OK,
        Json(ApiResponse::success(resp, "Attendance recorded")),
    )
}

enum MarkError {
    Invalid(String),
    Db(sea_orm::DbErr),
}

impl From<sea_orm::DbErr> for MarkError {
    fn from(e: sea_orm::DbErr) -> Self {
        MarkError::Db(e)
    }
}

fn details_from(req: &BulkMarkRequest) -> Option<RecordDetails> {
    let details = RecordDetails {
        time: req.time.clone(),
        option: req.option.clone(),
        period_ids: None,
        text: req.text.clone(),
    };
    (details != RecordDetails::default()).then_some(details)
}

async fn mark_absent(
    db: &sea_orm::DatabaseConnection,
    req: &BulkMarkRequest,
    created_by: i64,
) -> Result<Vec<attendance_record::Model>, MarkError> {
    let period_ids = req.period_ids.clone().unwrap_or_default();
    Ok(attendance_record::Model::replace_absent(
        db,
        req.class_id,
        req.date,
        &req.student_ids,
        &period_ids,
        created_by,
    )
    .await?)
}

async fn mark_single_period(
    db: &sea_orm::DatabaseConnection,
    req: &BulkMarkRequest,
    created_by: i64,
) -> Result<Vec<attendance_record::Model>, MarkError> {
    // Explicit user-selected period wins; otherwise the status default.
    let period_id = match req.period_id {
        Some(period_id) => period_id,
        None => match req.status {
            Status::Late => setting::Model::get_i64_or(db, "late_default_period", 1).await,
            _ => setting::Model::get_i64_or(db, "early_leave_default_period", 8).await,
        },
    };

    let mut created = Vec::with_capacity(req.student_ids.len());
    for &student_id in &req.student_ids {
        created.push(
            attendance_record::Model::create(
                db,
                NewAttendanceRecord {
                    student_id,
                    class_id: req.class_id,
                    date: req.date,
                    period_id: Some(period_id),
                    status: req.status.clone(),
                    leave_type_id: None,
                    details: details_from(req),
                    source_type: SourceType::Manual,
                    source_id: None,
                    approval_status: None,
                    created_by,
                },
            )
            .await?,
        );
    }
    Ok(created)
}

async fn mark_leave(
    db: &sea_orm::DatabaseConnection,
    req: &BulkMarkRequest,
    created_by: i64,
) -> Result<Vec<attendance_record::Model>, MarkError> {
    let leave_type_id = req
        .leave_type_id
        .ok_or_else(|| MarkError::Invalid("A leave type is required".into()))?;
    if leave_type::Model::get_by_id(db, leave_type_id).await?.is_none() {
        return Err(MarkError::Invalid("Unknown leave type".into()));
    }

    let mut details = details_from(req).unwrap_or_default();
    details.period_ids = req.period_ids.clone();
    let details = (details != RecordDetails::default()).then_some(details);

    let mut created = Vec::with_capacity(req.student_ids.len());
    for &student_id in &req.student_ids {
        created.push(
            attendance_record::Model::create(
                db,
                NewAttendanceRecord {
                    student_id,
                    class_id: req.class_id,
                    date: req.date,
                    period_id: None,
                    status: Status::Leave,
                    leave_type_id: Some(leave_type_id),
                    details: details.clone(),
                    source_type: SourceType::Manual,
                    source_id: None,
                    approval_status: None,
                    created_by,
                },
            )
            .await?,
        );
    }
    Ok(created)
}

async fn mark_whole_day(
    db: &sea_orm::DatabaseConnection,
    req: &BulkMarkRequest,
    created_by: i64,
) -> Result<Vec<attendance_record::Model>, MarkError> {
    let mut created = Vec::with_capacity(req.student_ids.len());
    for &student_id in &req.student_ids {
        created.push(
            attendance_record::Model::create(
                db,
                NewAttendanceRecord {
                    student_id,
                    class_id: req.class_id,
                    date: req.date,
                    period_id: None,
                    status: req.status.clone(),
                    leave_type_id: None,
                    details: details_from(req),
                    source_type: SourceType::Manual,
                    source_id: None,
                    approval_status: None,
                    created_by,
                },
            )
            .await?,
        );
    }
    Ok(created)
}
