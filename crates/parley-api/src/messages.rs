use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use parley_db::models::GlobalMessageRow;
use parley_types::api::{Claims, GlobalMessageResponse, PostMessageRequest, UpdateMessageRequest};
use parley_types::time::display_time;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::{created_at, with_db};

fn to_response(row: GlobalMessageRow) -> GlobalMessageResponse {
    let created_at = created_at(&row.created_at, "message", row.id);
    GlobalMessageResponse {
        id: row.id,
        description: row.description,
        time: display_time(&created_at),
        created_at,
        user_id: row.user_id,
        tarkov_name: row.tarkov_name,
    }
}

/// GET /messages — the whole global channel, oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = with_db(&state, "list_messages", |db| db.list_messages()).await?;
    Ok(Json(rows.into_iter().map(to_response).collect::<Vec<_>>()))
}

/// POST /messages — post to the global channel as the caller.
pub async fn post_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<PostMessageRequest>,
) -> Result<StatusCode, ApiError> {
    let author_id = claims.sub;
    let id = with_db(&state, "insert_message", move |db| {
        db.insert_message(author_id, &req.message)
    })
    .await?;

    info!("User {} posted global message {}", author_id, id);
    Ok(StatusCode::CREATED)
}

/// PUT /messages/{id}
///
/// Any authenticated user may edit any message; there is no ownership check.
pub async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(_claims): Extension<Claims>,
    Json(req): Json<UpdateMessageRequest>,
) -> Result<StatusCode, ApiError> {
    let updated = with_db(&state, "update_message", move |db| {
        db.update_message(id, &req.message)
    })
    .await?;

    if updated { Ok(StatusCode::NO_CONTENT) } else { Err(ApiError::NotFound) }
}

/// DELETE /messages/{id} — same ownership caveat as updates.
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<StatusCode, ApiError> {
    let deleted = with_db(&state, "delete_message", move |db| db.delete_message(id)).await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    info!("User {} deleted global message {}", claims.sub, id);
    Ok(StatusCode::NO_CONTENT)
}
