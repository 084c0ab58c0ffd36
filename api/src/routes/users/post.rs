use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::{UserResponse, format_validation_errors};
use db::models::{
    school_class,
    user,
    user_class_role::{self, Role},
};
use util::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub admin: Option<bool>,
}

/// POST `/api/users`
///
/// Create a user account.
///
/// **Auth**: Admin only (router layer).
///
/// ### Responses
/// - `201 Created` with the new `UserResponse`
/// - `400 Bad Request` on validation failure
/// - `409 Conflict` when the username or email is already taken
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> (StatusCode, Json<ApiResponse<UserResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    let db = state.db();

    match user::Model::get_by_username(db, &req.username).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::error(
                    "A user with this username already exists",
                )),
            );
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "Failed to check username uniqueness");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error creating user")),
            );
        }
    }

    match user::Model::create(
        db,
        &req.username,
        &req.email,
        &req.password,
        req.admin.unwrap_or(false),
    )
    .await
    {
        Ok(user) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(user.into(), "User created")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to create user: {e}"))),
        ),
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignClassRequest {
    pub class_id: i64,
    pub role: Role,
}

#[derive(Debug, serde::Serialize, Default)]
pub struct EnrollmentResponse {
    pub user_id: i64,
    pub class_id: i64,
    pub role: String,
}

/// POST `/api/users/{user_id}/classes`
///
/// Enroll a user into a class as teacher or student.
///
/// **Auth**: Admin only (router layer).
pub async fn assign_class(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<AssignClassRequest>,
) -> (StatusCode, Json<ApiResponse<EnrollmentResponse>>) {
    let db = state.db();

    let user_exists = matches!(user::Model::get_by_id(db, user_id).await, Ok(Some(_)));
    let class_exists = matches!(
        school_class::Model::get_by_id(db, req.class_id).await,
        Ok(Some(_))
    );
    if !user_exists || !class_exists {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User or class not found")),
        );
    }

    match user_class_role::Model::assign_user_to_class(db, user_id, req.class_id, req.role).await {
        Ok(enrollment) => {
            let resp = EnrollmentResponse {
                user_id: enrollment.user_id,
                class_id: enrollment.class_id,
                role: enrollment.role.to_string(),
            };
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(resp, "User enrolled in class")),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to enroll user: {e}"))),
        ),
    }
}
