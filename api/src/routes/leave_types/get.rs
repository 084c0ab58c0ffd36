use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::response::ApiResponse;
use db::models::leave_type;
use util::state::AppState;

#[derive(Debug, Serialize, Default)]
pub struct LeaveTypeResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub input_type: String,
    pub input_config: Value,
}

impl From<leave_type::Model> for LeaveTypeResponse {
    fn from(m: leave_type::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            input_type: m.input_type.to_string(),
            input_config: m
                .input_config
                .as_deref()
                .and_then(|raw| serde_json::from_str(raw).ok())
                .unwrap_or(Value::Null),
        }
    }
}

/// GET `/api/leave-types`
///
/// The configured leave type catalogue with each type's input schema.
pub async fn list_leave_types(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<LeaveTypeResponse>>>) {
    match leave_type::Model::get_all(state.db()).await {
        Ok(types) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                types.into_iter().map(Into::into).collect(),
                "Leave types retrieved",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list leave types");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving leave types")),
            )
        }
    }
}
