use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use parley_db::models::NotificationRow;
use parley_types::api::{
    Claims, CreateNotificationRequest, NotificationResponse, UnreadCountResponse,
};
use parley_types::time::display_time;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::{created_at, with_db};

fn to_response(row: NotificationRow) -> NotificationResponse {
    let created_at = created_at(&row.created_at, "notification", row.id);
    NotificationResponse {
        id: row.id,
        from: row.origin,
        message: row.message,
        time: display_time(&created_at),
        created_at,
        receiver_user_id: row.receiver_user_id,
        unread: row.read_state.is_unread(),
        is_read: row.read_state.as_flag(),
    }
}

/// GET /notifications — the caller's unread notifications.
pub async fn list_unread(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let receiver = claims.sub;
    let rows = with_db(&state, "list_unread_notifications", move |db| {
        db.list_unread_notifications(receiver)
    })
    .await?;

    Ok(Json(rows.into_iter().map(to_response).collect::<Vec<_>>()))
}

/// GET /notifications/unread-count
pub async fn count_unread(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let receiver = claims.sub;
    let count = with_db(&state, "count_unread_notifications", move |db| {
        db.count_unread_notifications(receiver)
    })
    .await?;

    Ok(Json(UnreadCountResponse { count }))
}

/// POST /notifications
pub async fn create_notification(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    Json(req): Json<CreateNotificationRequest>,
) -> Result<StatusCode, ApiError> {
    with_db(&state, "create_notification", move |db| {
        db.create_notification(&req.from, req.receiver_id, &req.message)
    })
    .await?;

    Ok(StatusCode::CREATED)
}

/// PUT /notifications/{id}/read
///
/// Does not check that the notification belongs to the caller.
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(_claims): Extension<Claims>,
) -> Result<StatusCode, ApiError> {
    let found = with_db(&state, "mark_notification_read", move |db| {
        db.mark_notification_read(id)
    })
    .await?;

    if found { Ok(StatusCode::NO_CONTENT) } else { Err(ApiError::NotFound) }
}
