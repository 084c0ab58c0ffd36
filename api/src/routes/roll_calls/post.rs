use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use sea_orm::DbErr;
use serde::Deserialize;
use std::future::Future;

use crate::auth::AuthUser;
use crate::auth::guards::can_manage_class;
use crate::response::ApiResponse;
use db::models::{roll_call, roll_call_record, school_class};
use util::state::AppState;

use super::common::RollCallResponse;

#[derive(Debug, Deserialize)]
pub struct CreateRollCallReq {
    pub class_id: i64,
    /// Configured activity type, e.g. "morning_exercise".
    pub call_type: String,
    pub date: NaiveDate,
}

/// POST `/api/roll-calls`
///
/// Open a session for a class; every enrolled student starts `pending`.
///
/// **Auth**: a teacher of the class, or an admin.
pub async fn create_roll_call(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<CreateRollCallReq>,
) -> (StatusCode, Json<ApiResponse<RollCallResponse>>) {
    let db = state.db();

    if !can_manage_class(db, &claims, body.class_id).await {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Not a teacher of this class")),
        );
    }
    if body.call_type.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("A call type is required")),
        );
    }
    if !matches!(
        school_class::Model::get_by_id(db, body.class_id).await,
        Ok(Some(_))
    ) {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Class not found")),
        );
    }

    match roll_call::Model::create_with_records(
        db,
        body.class_id,
        body.call_type.trim(),
        body.date,
        claims.sub,
    )
    .await
    {
        Ok(call) => {
            let counts = roll_call_record::Model::status_counts(db, call.id)
                .await
                .unwrap_or_default();
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    RollCallResponse::from_with_counts(call, counts),
                    "Roll call created",
                )),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to create roll call: {e}"))),
        ),
    }
}

/// Shared scaffold for the three lifecycle transitions: loads the session,
/// checks the caller teaches its class, then applies `transition`.
async fn transition_roll_call<F, Fut>(
    state: &AppState,
    claims: &crate::auth::Claims,
    roll_call_id: i64,
    transition: F,
) -> (StatusCode, Json<ApiResponse<RollCallResponse>>)
where
    F: FnOnce(sea_orm::DatabaseConnection, i64) -> Fut,
    Fut: Future<Output = Result<roll_call::Model, DbErr>>,
{
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
                Json(ApiResponse::error("Database error updating roll call")),
            );
        }
    };

    if !can_manage_class(db, claims, call.class_id).await {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Not a teacher of this class")),
        );
    }

    match transition(state.db_clone(), roll_call_id).await {
        Ok(updated) => {
            let counts = roll_call_record::Model::status_counts(db, updated.id)
                .await
                .unwrap_or_default();
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    RollCallResponse::from_with_counts(updated, counts),
                    "Roll call updated",
                )),
            )
        }
        Err(DbErr::Custom(message)) => {
            (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
        }
        Err(e) => {
            tracing::error!(error = %e, "Roll call transition failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error updating roll call")),
            )
        }
    }
}

/// POST `/api/roll-calls/{roll_call_id}/complete`
///
/// Close an in-progress session and write absent/on-leave results through to
/// attendance records.
pub async fn complete_roll_call(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(roll_call_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<RollCallResponse>>) {
    transition_roll_call(&state, &claims, roll_call_id, |db, id| async move {
        roll_call::Model::complete(&db, id).await
    })
    .await
}

/// POST `/api/roll-calls/{roll_call_id}/cancel`
///
/// Cancel an in-progress session, removing any derived attendance records.
pub async fn cancel_roll_call(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(roll_call_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<RollCallResponse>>) {
    transition_roll_call(&state, &claims, roll_call_id, |db, id| async move {
        roll_call::Model::cancel(&db, id).await
    })
    .await
}

/// POST `/api/roll-calls/{roll_call_id}/restore`
///
/// Reopen a cancelled session.
pub async fn restore_roll_call(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(roll_call_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<RollCallResponse>>) {
    transition_roll_call(&state, &claims, roll_call_id, |db, id| async move {
        roll_call::Model::restore(&db, id).await
    })
    .await
}
