use axum::{Json, extract::State, http::StatusCode};
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::UserResponse;
use db::models::user;
use util::state::AppState;

/// GET /auth/me
///
/// Returns the authenticated user's profile.
///
/// ### Responses
/// - `200 OK` with a `UserResponse` payload
/// - `401 Unauthorized` when the token is missing or invalid
/// - `404 Not Found` when the token's user no longer exists
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> (StatusCode, Json<ApiResponse<UserResponse>>) {
    let db = state.db();

    match user::Model::get_by_id(db, claims.sub).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(ApiResponse::success(user.into(), "User retrieved")),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load current user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving user")),
            )
        }
    }
}
