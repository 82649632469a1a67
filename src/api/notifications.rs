use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{ApiError, ApiResult, AppState},
    models::Notification,
};

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    /// Number of notifications in this page, not the table-wide row count.
    pub count: i64,
}

/// List a user's notifications: the in-app inbox read path.
pub async fn list_user_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ListNotificationsQuery>,
) -> ApiResult<impl IntoResponse> {
    if query.limit < 1 || query.limit > 100 {
        return Err(ApiError::BadRequest(
            "Limit must be between 1 and 100".to_string(),
        ));
    }

    if query.offset < 0 {
        return Err(ApiError::BadRequest("Offset must be non-negative".to_string()));
    }

    let notifications = state
        .db
        .list_notifications_for_user(&user_id, query.limit, query.offset)
        .await?;

    let count = notifications.len() as i64;

    Ok(Json(NotificationListResponse {
        notifications,
        count,
    }))
}
