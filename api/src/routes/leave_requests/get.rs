use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::auth::AuthUser;
use crate::auth::guards::can_manage_class;
use crate::response::ApiResponse;
use db::models::leave_request::{self, Status};
use util::state::AppState;

use super::common::LeaveRequestResponse;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// When present, the review queue of that class (teacher/admin only);
    /// otherwise the caller's own submissions.
    pub class_id: Option<i64>,
    /// Filter by `pending` / `approved` / `rejected`.
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct ListResponse {
    pub leave_requests: Vec<LeaveRequestResponse>,
}

/// GET `/api/leave-requests`
///
/// Without `class_id`, lists the caller's own submissions. With `class_id`,
/// lists that class's requests for review.
///
/// **Auth**: any authenticated user for own submissions; a teacher of the
/// class or an admin for class queues.
pub async fn list_leave_requests(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(q): Query<ListQuery>,
) -> (StatusCode, Json<ApiResponse<ListResponse>>) {
    let db = state.db();

    let status = match q.status.as_deref() {
        Some(raw) => match Status::from_str(raw) {
            Ok(status) => Some(status),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error("Unknown status filter")),
                );
            }
        },
        None => None,
    };

    let result = match q.class_id {
        Some(class_id) => {
            if !can_manage_class(db, &claims, class_id).await {
                return (
                    StatusCode::FORBIDDEN,
                    Json(ApiResponse::error("Not a teacher of this class")),
                );
            }
            leave_request::Model::for_class(db, class_id, status).await
        }
        None => leave_request::Model::for_student(db, claims.sub).await.map(|requests| {
            match status {
                Some(status) => requests.into_iter().filter(|r| r.status == status).collect(),
                None => requests,
            }
        }),
    };

    match result {
        Ok(requests) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ListResponse {
                    leave_requests: requests.into_iter().map(Into::into).collect(),
                },
                "Leave requests retrieved",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list leave requests");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving leave requests")),
            )
        }
    }
}
