use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use std::path::{Path as FsPath, PathBuf};

use crate::auth::AuthUser;
use crate::auth::guards::can_manage_class;
use crate::response::ApiResponse;
use db::models::{
    attendance_record::RecordDetails,
    leave_request, leave_type, user,
};
use util::{config, state::AppState};

use super::common::{LeaveRequestResponse, validate_input};

const ALLOWED_IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Deserialize)]
pub struct CreateLeaveRequestReq {
    pub class_id: i64,
    pub leave_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub details: Option<RecordDetails>,
    /// Paths previously returned by the image upload endpoint.
    pub images: Option<Vec<String>>,
}

/// POST `/api/leave-requests`
///
/// Submit a leave application for the authenticated student.
///
/// **Validation**: the student must belong to the class, the date range must
/// be ordered, and the payload must satisfy the leave type's input schema.
pub async fn create_leave_request(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateLeaveRequestReq>,
) -> (StatusCode, Json<ApiResponse<LeaveRequestResponse>>) {
    let db = state.db();

    match user::Model::is_student_of(db, claims.sub, req.class_id).await {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::FORBIDDEN,
                Json(ApiResponse::error("Not a student of this class")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to check class membership");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error submitting leave request")),
            );
        }
    }

    if req.end_date < req.start_date {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("End date is before start date")),
        );
    }

    let leave_type = match leave_type::Model::get_by_id(db, req.leave_type_id).await {
        Ok(Some(leave_type)) => leave_type,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("Unknown leave type")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load leave type");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error submitting leave request")),
            );
        }
    };

    if let Err(message) = validate_input(&leave_type, req.details.as_ref()) {
        return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)));
    }

    let images = req.images.unwrap_or_default();
    match leave_request::Model::create(
        db,
        claims.sub,
        req.class_id,
        req.leave_type_id,
        req.start_date,
        req.end_date,
        req.reason.as_deref(),
        req.details.as_ref(),
        &images,
    )
    .await
    {
        Ok(request) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(request.into(), "Leave request submitted")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!(
                "Failed to submit leave request: {e}"
            ))),
        ),
    }
}

#[derive(Debug, Serialize, Default)]
pub struct UploadResponse {
    /// Path relative to the leave image storage root.
    pub path: String,
}

/// POST `/api/leave-requests/images`
///
/// Multipart upload of one evidence image. The file is stored under the
/// configured storage root with a generated name; the returned path goes
/// into a subsequent submission's `images`.
///
/// **Limits**: jpg/jpeg/png/webp, size capped by `MAX_LEAVE_IMAGE_BYTES`.
pub async fn upload_image(
    Extension(AuthUser(_claims)): Extension<AuthUser>,
    mut multipart: Multipart,
) -> (StatusCode, Json<ApiResponse<UploadResponse>>) {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("image") {
            continue;
        }

        let extension = field
            .file_name()
            .and_then(|name| FsPath::new(name).extension()?.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        let Some(extension) = extension.filter(|e| ALLOWED_IMAGE_EXTENSIONS.contains(&e.as_str()))
        else {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("Unsupported image type")),
            );
        };

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read uploaded image");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error("Failed to read uploaded image")),
                );
            }
        };
        if bytes.len() > config::max_leave_image_bytes() {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("Image is too large")),
            );
        }

        let filename = format!("{}.{extension}", uuid::Uuid::new_v4());
        let root = PathBuf::from(config::leave_image_storage_root());
        if let Err(e) = std::fs::create_dir_all(&root) {
            tracing::error!(error = %e, "Failed to create image storage directory");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to store image")),
            );
        }
        if let Err(e) = std::fs::write(root.join(&filename), &bytes) {
            tracing::error!(error = %e, "Failed to write uploaded image");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to store image")),
            );
        }

        return (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                UploadResponse { path: filename },
                "Image uploaded",
            )),
        );
    }

    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error("No image field in upload")),
    )
}

/// Review transitions share this scaffold: load the request, check the
/// caller teaches its class, then apply approve/reject.
async fn review_leave_request(
    state: &AppState,
    claims: &crate::auth::Claims,
    request_id: i64,
    approve: bool,
) -> (StatusCode, Json<ApiResponse<LeaveRequestResponse>>) {
    let db = state.db();

    let request = match leave_request::Model::get_by_id(db, request_id).await {
        Ok(Some(request)) => request,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Leave request not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load leave request");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error reviewing leave request")),
            );
        }
    };

    if !can_manage_class(db, claims, request.class_id).await {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Not a teacher of this class")),
        );
    }

    let result = if approve {
        leave_request::Model::approve(db, request_id, claims.sub).await
    } else {
        leave_request::Model::reject(db, request_id, claims.sub).await
    };

    match result {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(updated.into(), "Leave request reviewed")),
        ),
        Err(DbErr::Custom(message)) => {
            (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
        }
        Err(e) => {
            tracing::error!(error = %e, "Leave request review failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error reviewing leave request")),
            )
        }
    }
}

/// POST `/api/leave-requests/{request_id}/approve`
///
/// Approve a pending request; the derived attendance records (status leave,
/// one per day of the range) are written in the same transaction.
pub async fn approve_leave_request(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(request_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<LeaveRequestResponse>>) {
    review_leave_request(&state, &claims, request_id, true).await
}

/// POST `/api/leave-requests/{request_id}/reject`
///
/// Reject a pending request.
pub async fn reject_leave_request(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(request_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<LeaveRequestResponse>>) {
    review_leave_request(&state, &claims, request_id, false).await
}
