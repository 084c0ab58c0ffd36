use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::EntityTrait;

use crate::auth::AuthUser;
use crate::auth::guards::can_manage_class;
use crate::response::ApiResponse;
use db::models::attendance_record;
use util::state::AppState;

/// DELETE `/api/attendance/records/{record_id}`
///
/// Remove a single attendance record.
///
/// **Auth**: a teacher of the record's class, or an admin.
pub async fn delete_record(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(record_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let db = state.db();

    let record = match attendance_record::Entity::find_by_id(record_id)
        .one(db)
        .await
    {
        Ok(Some(record)) => record,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Attendance record not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load attendance record");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error deleting record")),
            );
        }
    };

    if !can_manage_class(db, &claims, record.class_id).await {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Not a teacher of this class")),
        );
    }

    match attendance_record::Model::delete_by_id(db, record_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Attendance record deleted")),
        ),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Attendance record not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete attendance record");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error deleting record")),
            )
        }
    }
}
