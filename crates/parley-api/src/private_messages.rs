use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use parley_db::models::ConversationEntryRow;
use parley_types::api::{
    Claims, ConversationEntryResponse, SendPrivateMessageRequest, UpdateMessageRequest,
};
use parley_types::time::display_time;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::{created_at, with_db};

fn to_response(row: ConversationEntryRow) -> ConversationEntryResponse {
    let created_at = created_at(&row.created_at, "private message", row.id);
    ConversationEntryResponse {
        id: row.id,
        message: row.message,
        time: display_time(&created_at),
        created_at,
        user_id: row.user_id,
        sender_user_id: row.sender_user_id,
        receiver_user_id: row.receiver_user_id,
        username: row.sender_username,
    }
}

fn to_responses(rows: Vec<ConversationEntryRow>) -> Json<Vec<ConversationEntryResponse>> {
    Json(rows.into_iter().map(to_response).collect())
}

/// GET /private-messages — inbox summary, newest entry per partner.
pub async fn list_conversation_partners(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = claims.sub;
    let rows = with_db(&state, "list_conversation_partners", move |db| {
        db.list_conversation_partners(caller)
    })
    .await?;

    Ok(to_responses(rows))
}

/// GET /private-messages/{partner_id} — full conversation with one partner.
pub async fn list_thread(
    State(state): State<AppState>,
    Path(partner_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = claims.sub;
    let rows = with_db(&state, "list_thread", move |db| db.list_thread(caller, partner_id)).await?;

    Ok(to_responses(rows))
}

/// POST /private-messages
pub async fn send_private_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendPrivateMessageRequest>,
) -> Result<StatusCode, ApiError> {
    let author_id = claims.sub;
    let receiver_id = req.receiver_id;
    let id = with_db(&state, "send_private_message", move |db| {
        db.send_private_message(author_id, receiver_id, &req.message)
    })
    .await?;

    info!("User {} sent private message {} to {}", author_id, id, receiver_id);
    Ok(StatusCode::CREATED)
}

/// PUT /private-messages/{id} — no ownership check, as with global messages.
pub async fn update_private_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(_claims): Extension<Claims>,
    Json(req): Json<UpdateMessageRequest>,
) -> Result<StatusCode, ApiError> {
    let updated = with_db(&state, "update_private_message", move |db| {
        db.update_private_message(id, &req.message)
    })
    .await?;

    if updated { Ok(StatusCode::NO_CONTENT) } else { Err(ApiError::NotFound) }
}

/// DELETE /private-messages/{id}
pub async fn delete_private_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<StatusCode, ApiError> {
    let deleted = with_db(&state, "delete_private_message", move |db| {
        db.delete_private_message(id)
    })
    .await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    info!("User {} deleted private message {}", claims.sub, id);
    Ok(StatusCode::NO_CONTENT)
}
