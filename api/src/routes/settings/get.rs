use axum::{Json, extract::State, http::StatusCode};
use serde_json::Value;
use std::collections::HashMap;

use crate::response::ApiResponse;
use db::models::setting;
use util::state::AppState;

/// GET `/api/settings`
///
/// The whole settings table as a map. JSON-encoded values (e.g.
/// `attendance_periods`) come back decoded; everything else as a string.
pub async fn get_settings(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HashMap<String, Value>>>) {
    match setting::Model::get_map(state.db()).await {
        Ok(map) => (
            StatusCode::OK,
            Json(ApiResponse::success(map, "Settings retrieved")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load settings");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving settings")),
            )
        }
    }
}
