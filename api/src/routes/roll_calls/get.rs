use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::auth::AuthUser;
use crate::auth::guards::can_manage_class;
use crate::response::ApiResponse;
use db::models::{
    roll_call, roll_call_record,
    user::{Column as UserCol, Entity as UserEntity},
};
use util::state::AppState;

use super::common::{RollCallRecordResponse, RollCallResponse};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub class_id: i64,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Default)]
pub struct ListResponse {
    pub roll_calls: Vec<RollCallResponse>,
}

/// GET `/api/roll-calls`
///
/// List roll call sessions for a class, optionally narrowed to a date, with
/// per-status counts.
///
/// **Auth**: a teacher of the class, or an admin.
pub async fn list_roll_calls(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(q): Query<ListQuery>,
) -> (StatusCode, Json<ApiResponse<ListResponse>>) {
    let db = state.db();

    if !can_manage_class(db, &claims, q.class_id).await {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Not a teacher of this class")),
        );
    }

    let calls = match roll_call::Model::for_class(db, q.class_id, q.date).await {
        Ok(calls) => calls,
        Err(e) => {
            tracing::error!(error = %e, "Failed to list roll calls");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving roll calls")),
            );
        }
    };

    let mut out = Vec::with_capacity(calls.len());
    for call in calls {
        let counts = roll_call_record::Model::status_counts(db, call.id)
            .await
            .unwrap_or_default();
        out.push(RollCallResponse::from_with_counts(call, counts));
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            ListResponse { roll_calls: out },
            "Roll calls retrieved",
        )),
    )
}

#[derive(Debug, Serialize, Default)]
pub struct DetailResponse {
    pub roll_call: RollCallResponse,
    pub records: Vec<RollCallRecordResponse>,
}

/// GET `/api/roll-calls/{roll_call_id}`
///
/// Fetch one session with its per-student records.
///
/// **Auth**: a teacher of the session's class, or an admin.
pub async fn get_roll_call(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(roll_call_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<DetailResponse>>) {
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
                Json(ApiResponse::error("Database error retrieving roll call")),
            );
        }
    };

    if !can_manage_class(db, &claims, call.class_id).await {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Not a teacher of this class")),
        );
    }

    let records = roll_call_record::Model::for_roll_call(db, roll_call_id)
        .await
        .unwrap_or_default();

    // Resolve usernames for the record list.
    let student_ids: Vec<i64> = records.iter().map(|r| r.student_id).collect();
    let mut username_map = HashMap::<i64, String>::new();
    if !student_ids.is_empty() {
        let users = UserEntity::find()
            .filter(UserCol::Id.is_in(student_ids))
            .all(db)
            .await
            .unwrap_or_default();
        for user in users {
            username_map.insert(user.id, user.username);
        }
    }

    let counts = roll_call_record::Model::status_counts(db, roll_call_id)
        .await
        .unwrap_or_default();

    let resp = DetailResponse {
        roll_call: RollCallResponse::from_with_counts(call, counts),
        records: records
            .into_iter()
            .map(|r| {
                let username = username_map.get(&r.student_id).cloned();
                RollCallRecordResponse::new(r, username)
            })
            .collect(),
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(resp, "Roll call retrieved")),
    )
}
