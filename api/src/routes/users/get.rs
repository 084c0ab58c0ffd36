use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::response::ApiResponse;
use crate::routes::common::UserResponse;
use db::models::user::{Column as UserCol, Entity as UserEntity};
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i32>,
    pub per_page: Option<i32>,
    /// Fuzzy match on username or email.
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct ListResponse {
    pub users: Vec<UserResponse>,
    pub page: i32,
    pub per_page: i32,
    pub total: i32,
}

/// GET `/api/users`
///
/// List user accounts with pagination and search.
///
/// **Auth**: Admin only (router layer).
///
/// **Query**:
/// - `q` *(optional)*: fuzzy match on username or email
/// - `page` *(default 1)*
/// - `per_page` *(default 20, max 100)*
pub async fn list_users(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> (StatusCode, Json<ApiResponse<ListResponse>>) {
    let db = state.db();
    let page = q.page.unwrap_or(1).max(1) as u64;
    let per_page = q.per_page.unwrap_or(20).clamp(1, 100) as u64;

    let mut sel = UserEntity::find();
    if let Some(s) = q.q.as_ref().filter(|s| !s.trim().is_empty()) {
        sel = sel.filter(
            Condition::any()
                .add(UserCol::Username.contains(s.trim()))
                .add(UserCol::Email.contains(s.trim())),
        );
    }
    sel = sel.order_by_asc(UserCol::Username);

    let paginator = sel.paginate(db, per_page);
    let total = paginator.num_items().await.unwrap_or(0) as i32;
    let rows = paginator
        .fetch_page(page.saturating_sub(1))
        .await
        .unwrap_or_default();

    let resp = ListResponse {
        users: rows.into_iter().map(UserResponse::from).collect(),
        page: page as i32,
        per_page: per_page as i32,
        total,
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(resp, "Users retrieved")),
    )
}
