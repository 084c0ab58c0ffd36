use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::DbErr;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::auth::guards::can_manage_class;
use crate::response::ApiResponse;
use db::models::{roll_call, roll_call_record};
use util::state::AppState;

use super::common::RollCallRecordResponse;

#[derive(Debug, Deserialize)]
pub struct MarkStudentReq {
    pub status: roll_call_record::Status,
}

/// PUT `/api/roll-calls/{roll_call_id}/records/{student_id}`
///
/// Mark one student within an in-progress session.
///
/// **Auth**: a teacher of the session's class, or an admin.
///
/// **Notes**:
/// - Returns `400` when the session is not in progress.
pub async fn mark_student(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path((roll_call_id, student_id)): Path<(i64, i64)>,
    Json(body): Json<MarkStudentReq>,
) -> (StatusCode, Json<ApiResponse<Option<RollCallRecordResponse>>>) {
    let db = state.db();

    let call = match roll_call::Model::get_by_id(db, roll_call_id).await {
        Ok(Some(call)) => call,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Roll call not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load roll call");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error marking student")),
            );
        }
    };

    if !can_manage_class(db, &claims, call.class_id).await {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Not a teacher of this class")),
        );
    }
    if call.status != roll_call::Status::InProgress {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Roll call is not in progress")),
        );
    }

    match roll_call_record::Model::mark(db, roll_call_id, student_id, body.status).await {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(RollCallRecordResponse::new(record, None)),
                "Student marked",
            )),
        ),
        Err(DbErr::RecordNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Student is not part of this roll call")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to mark roll call record");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error marking student")),
            )
        }
    }
}
