use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::response::ApiResponse;
use db::models::setting;
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateSettingReq {
    /// Stored verbatim; send JSON text for structured settings.
    pub value: String,
}

/// PUT `/api/settings/{key}`
///
/// Upsert one setting.
///
/// **Auth**: Admin only (router layer).
pub async fn update_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<UpdateSettingReq>,
) -> (StatusCode, Json<ApiResponse<Option<setting::Model>>>) {
    match setting::Model::set(state.db(), &key, &req.value).await {
        Ok(saved) => (
            StatusCode::OK,
            Json(ApiResponse::success(Some(saved), "Setting saved")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to save setting");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error saving setting")),
            )
        }
    }
}
